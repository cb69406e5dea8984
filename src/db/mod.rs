//! Database module
//!
//! Local SQLite store for tasks, transactions, goals and quick-add history.

pub mod connection;
pub mod models;
pub mod queries;

pub use connection::Database;
pub use models::*;
