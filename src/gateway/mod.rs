//! HTTP gateway: router assembly and server startup.

pub mod openapi;
pub mod state;

use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::accounts::handlers as account_handlers;
use crate::auth::handlers as auth_handlers;
use crate::auth::jwt_auth_middleware;
use crate::auth::AuthService;
use crate::config::AppConfig;
use crate::db::Database;
use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::transactions::handlers as transaction_handlers;
use crate::users::handlers as user_handlers;
use state::AppState;

/// Service health check
///
/// GET /api/v1/health
#[utoipa::path(
    get,
    path = "/api/v1/health",
    responses(
        (status = 200, description = "Service and database are up"),
        (status = 500, description = "Database unreachable")
    ),
    tag = "Health"
)]
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    state.db.health_check().await?;
    Ok((
        StatusCode::OK,
        Json(ApiResponse::message(StatusCode::OK, "ok")),
    ))
}

/// Fixed 404 for unknown routes
async fn handle_404() -> (StatusCode, Json<ApiResponse<()>>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::message(StatusCode::NOT_FOUND, "Are you lost?")),
    )
}

/// Build the full application router
pub fn build_router(state: Arc<AppState>) -> Router {
    // Register and login are public; everything else sits behind the JWT layer
    let auth_routes = Router::new()
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        .merge(
            Router::new()
                .route("/authenticate", get(auth_handlers::authenticate))
                .layer(from_fn_with_state(state.clone(), jwt_auth_middleware)),
        );

    let user_routes = Router::new()
        .route(
            "/",
            get(user_handlers::get_all_users).post(user_handlers::create_user),
        )
        .route(
            "/{user_id}",
            get(user_handlers::get_user)
                .put(user_handlers::update_user)
                .delete(user_handlers::delete_user),
        )
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let account_routes = Router::new()
        .route(
            "/",
            get(account_handlers::get_all_accounts).post(account_handlers::create_account),
        )
        .route(
            "/{account_id}",
            get(account_handlers::get_account)
                .put(account_handlers::update_account)
                .delete(account_handlers::delete_account),
        )
        .route("/{account_id}/deposit", post(account_handlers::deposit))
        .route("/{account_id}/withdraw", post(account_handlers::withdraw))
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    let transaction_routes = Router::new()
        .route(
            "/",
            get(transaction_handlers::get_all_transactions)
                .post(transaction_handlers::create_transaction),
        )
        .route(
            "/{transaction_id}",
            get(transaction_handlers::get_transaction)
                .delete(transaction_handlers::delete_transaction),
        )
        .layer(from_fn_with_state(state.clone(), jwt_auth_middleware));

    Router::new()
        .route("/api/v1/health", get(health_check))
        .nest("/api/v1/auth", auth_routes)
        .nest("/api/v1/users", user_routes)
        .nest("/api/v1/accounts", account_routes)
        .nest("/api/v1/transactions", transaction_routes)
        .fallback(handle_404)
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start the HTTP server
pub async fn run_server(config: &AppConfig, db: Arc<Database>) -> anyhow::Result<()> {
    let auth = Arc::new(AuthService::new(config.jwt_secret.clone()));
    let state = Arc::new(AppState::new(db, auth));

    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind to {}: {}", addr, e))?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
