//! infast library
//!
//! Quick-add for the InFast planner: one line of Uzbek text becomes a task,
//! an income or expense, or a step toward a savings goal.

pub mod config;
pub mod core;
pub mod db;
pub mod error;
pub mod intent;

// Re-exports for convenience
pub use config::Config;
pub use db::Database;
pub use error::{InFastError, Result};
pub use intent::{IntentParser, IntentType, ParsedIntent};
