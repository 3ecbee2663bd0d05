//! Minibank - a toy banking REST API
//!
//! Users register and authenticate with self-issued bearer tokens, own bank
//! accounts, and move money around: deposits, withdrawals, and atomic
//! inter-account transfers recorded in a transaction ledger. Deleting a
//! ledger entry applies the compensating reversal.
//!
//! # Modules
//!
//! - [`config`] - YAML configuration per environment
//! - [`db`] - PostgreSQL connection pool and migrations
//! - [`models`] - Row types and API views
//! - [`auth`] - Password hashing, token issuance, JWT middleware
//! - [`users`] - User CRUD with profile upsert
//! - [`accounts`] - Bank account CRUD, deposit/withdraw
//! - [`transactions`] - Atomic transfers and reversals
//! - [`gateway`] - Router assembly and server startup

pub mod accounts;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod models;
pub mod response;
pub mod transactions;
pub mod users;

// Convenient re-exports at crate root
pub use accounts::AccountRepository;
pub use auth::{AuthService, Claims, CurrentUser};
pub use config::AppConfig;
pub use db::Database;
pub use error::ApiError;
pub use models::{AccountDetail, BankAccount, Profile, Transaction, TransactionDetail, User, UserView};
pub use response::ApiResponse;
pub use transactions::TransactionRepository;
pub use users::{ProfileInput, UserRepository};
