//! User CRUD: registration-style create, profile upsert, cascading delete.

pub mod handlers;
pub mod repository;

pub use repository::{ProfileInput, UserRepository};
