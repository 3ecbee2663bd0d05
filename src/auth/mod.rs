//! User authentication: password hashing, token issuance, JWT middleware.

pub mod handlers;
pub mod middleware;
pub mod service;

pub use middleware::{jwt_auth_middleware, CurrentUser};
pub use service::{AuthService, Claims};
