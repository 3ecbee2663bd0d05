use std::sync::Arc;

use crate::auth::AuthService;
use crate::db::Database;

/// Shared application state
///
/// The database pool is passed explicitly instead of living in a global;
/// every repository call receives it from here.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: Arc<Database>, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }
}
