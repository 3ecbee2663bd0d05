use std::sync::Arc;

use minibank::config::AppConfig;
use minibank::db::Database;
use minibank::{gateway, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Usage: minibank [env]   (reads config/{env}.yaml, default "dev")
    let env = std::env::args().nth(1).unwrap_or_else(|| "dev".to_string());
    let config = AppConfig::load(&env)?;

    let _guard = logging::init_logging(&config);
    tracing::info!("minibank v{} starting (env: {})", env!("CARGO_PKG_VERSION"), env);

    let db = Arc::new(Database::connect(&config.database_url).await?);
    db.migrate().await?;

    gateway::run_server(&config, db).await
}
