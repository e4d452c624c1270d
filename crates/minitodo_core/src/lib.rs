//! Core domain logic for minitodo.
//! This crate owns the task invariants; front ends only call into it.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod input;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use auth::provider::{AuthError, AuthProvider, HostAuthProvider};
pub use auth::session::{SessionHolder, SessionState};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use input::dictation::{
    ChannelDictationSource, DictationBridge, DictationError, DictationEvent, DictationFeed,
    DictationSource, DictationState, DICTATION_UNAVAILABLE_MESSAGE,
};
pub use input::draft::TaskDraft;
pub use input::source::TextInputSource;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::session::Identity;
pub use model::task::{NewTask, Priority, Task, TaskId, TaskPatch, TaskValidationError};
pub use repo::memory_store::InMemoryTaskStore;
pub use repo::sqlite_store::SqliteTaskStore;
pub use repo::task_store::{StoreError, StoreResult, TaskStore};
pub use service::analytics::{AnalyticsAggregator, TaskStats};
pub use service::clock::{Clock, FixedClock, SystemClock};
pub use service::task_list::{TaskFilter, TaskListController};
pub use service::todo_app::TodoApp;

/// Health-check probe for host integrations.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
