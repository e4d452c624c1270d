//! Local SQLite file behind `SqliteTaskStore`.
//!
//! The database holds one `tasks` table keyed by UUID text and indexed by
//! `(owner_id, created_at)` for owner-scoped loads. Schema changes ship as
//! numbered SQL files under `migrations/`.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - Callers only ever see fully migrated connections.
//! - A failed migration rolls back and names the version that failed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Migration `version` failed; nothing from that run was committed.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The task file was written by a newer minitodo build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "task database error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "task schema migration {version:04} failed: {source}")
            }
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "task database schema version {db_version} is newer than supported {latest_supported}; update minitodo"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
