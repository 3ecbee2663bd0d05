//! Transfer ledger: atomic inter-account transfers and their reversals.

pub mod handlers;
pub mod repository;

pub use repository::TransactionRepository;
