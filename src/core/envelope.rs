//! `{success, message, data}` wrapper used by the InFast REST backend
//!
//! CLI JSON output uses the same shape so it can be posted as-is.

use crate::error::InFastError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
        }
    }

    /// Failed envelope carrying the user-facing text of an error
    pub fn from_error(error: &InFastError) -> Self {
        Self::err(error.user_message())
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}
