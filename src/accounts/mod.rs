//! Bank account CRUD plus single-account balance mutations.

pub mod handlers;
pub mod repository;

pub use repository::AccountRepository;
