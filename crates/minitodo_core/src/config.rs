//! Runtime configuration resolved from the environment.
//!
//! # Invariants
//! - Blank environment values count as unset.
//! - Logging stays off unless a log directory is configured.

use crate::logging::{default_log_level, init_logging};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "MINITODO_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "MINITODO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "MINITODO_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "minitodo.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// SQLite file backing the local task store.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Reads `MINITODO_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through `lookup`, falling back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            db_path: read(ENV_DB_PATH).map_or(defaults.db_path, PathBuf::from),
            log_level: read(ENV_LOG_LEVEL).unwrap_or(defaults.log_level),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        }
    }

    /// Starts file logging when a log directory is configured.
    ///
    /// Returns `Ok(false)` when logging is not configured.
    pub fn init_logging(&self) -> Result<bool, String> {
        let Some(log_dir) = self.log_dir.as_ref() else {
            return Ok(false);
        };
        let log_dir = log_dir
            .to_str()
            .ok_or_else(|| format!("log_dir is not valid UTF-8: {}", log_dir.display()))?;
        init_logging(&self.log_level, log_dir)?;
        Ok(true)
    }
}
