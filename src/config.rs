//! Runtime configuration read from the environment
//!
//! `INFAST_DB` overrides the database location, `INFAST_LOG` the log filter.

use crate::error::{InFastError, Result};
use std::path::{Path, PathBuf};

pub const DB_ENV: &str = "INFAST_DB";
pub const LOG_ENV: &str = "INFAST_LOG";
pub const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub db_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(
            std::env::var(DB_ENV).ok(),
            std::env::var(LOG_ENV).ok(),
            dirs::home_dir().as_deref(),
        )
    }

    /// Build from already-read values, blanks count as unset
    pub fn from_vars(
        db: Option<String>,
        log: Option<String>,
        home: Option<&Path>,
    ) -> Result<Self> {
        let db_path = match db.filter(|v| !v.trim().is_empty()) {
            Some(path) => PathBuf::from(path.trim()),
            None => home
                .map(|h| h.join(".infast").join("infast.db"))
                .ok_or_else(|| {
                    InFastError::Config(format!(
                        "Could not find home directory, set {} to a database path",
                        DB_ENV
                    ))
                })?,
        };

        let log_filter = log
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            db_path,
            log_filter,
        })
    }
}
