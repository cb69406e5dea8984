//! Error types for infast
//!
//! This module defines all possible errors that can occur in the application.
//! Uses thiserror for ergonomic error handling.

use crate::core::validation::ValidationErrors;
use thiserror::Error;

/// Main error type for infast operations
#[derive(Error, Debug)]
pub enum InFastError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Built-in pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Input could not be turned into anything useful
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Quick-add text exceeds maximum length
    #[error("Input exceeds maximum allowed length of {0} characters")]
    InputTooLong(usize),

    /// A finance entry or goal step was parsed without an amount
    #[error("No amount found in input")]
    MissingAmount,

    /// Goal referenced by name does not exist
    #[error("Goal not found: {0}")]
    GoalNotFound(String),

    /// Task referenced by id does not exist
    #[error("Task not found: {0}")]
    TaskNotFound(i64),

    /// Form validation failed on one or more fields
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for infast operations
pub type Result<T> = std::result::Result<T, InFastError>;

/// Convert InFastError to a user-friendly error message
impl InFastError {
    pub fn user_message(&self) -> String {
        match self {
            InFastError::Database(e) => {
                format!("Database error occurred. Please try again. Details: {}", e)
            }
            InFastError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            InFastError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            InFastError::Pattern(e) => {
                format!("Internal pattern error: {}", e)
            }
            InFastError::InvalidInput(reason) => {
                format!("Could not understand that: {}", reason)
            }
            InFastError::InputTooLong(max) => {
                format!("Text is too long, keep it under {} characters", max)
            }
            InFastError::MissingAmount => {
                "Add an amount, e.g. '25 ming' or '2 mln'".to_string()
            }
            InFastError::GoalNotFound(name) => {
                format!("No goal named '{}'. Create it first", name)
            }
            InFastError::TaskNotFound(id) => {
                format!("Task #{} does not exist", id)
            }
            InFastError::Validation(errors) => {
                format!("Please fix: {}", errors)
            }
            InFastError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
        }
    }
}
