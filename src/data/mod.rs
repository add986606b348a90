//! Data layer
//!
//! SQLite persistence for user profile records. Point-reads and
//! point-updates only; no multi-row transactions are needed.

pub mod database;
pub mod models;

pub use database::Database;
pub use models::*;
