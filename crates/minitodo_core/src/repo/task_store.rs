//! `TaskStore` capability contract.

use crate::db::DbError;
use crate::model::task::{NewTask, Task, TaskId, TaskPatch, TaskValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Failure of any store call.
#[derive(Debug)]
pub enum StoreError {
    Validation(TaskValidationError),
    Db(DbError),
    NotFound(TaskId),
    InvalidData(String),
    /// Backend-specific failure reported by a non-SQLite store.
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "task not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted task data: {message}"),
            Self::Backend(message) => write!(f, "task store unavailable: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) | Self::Backend(_) => None,
        }
    }
}

impl From<TaskValidationError> for StoreError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Document collection of tasks keyed by owner identity.
///
/// No transactional guarantee spans multiple calls.
pub trait TaskStore {
    /// Returns every task owned by `owner_id`. Order is unspecified.
    fn query(&self, owner_id: &str) -> StoreResult<Vec<Task>>;
    /// Persists a new task and returns its store-assigned id.
    fn create(&self, new_task: &NewTask) -> StoreResult<TaskId>;
    fn update(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<()>;
    /// Removes a task permanently. Missing ids are not an error.
    fn delete(&self, id: TaskId) -> StoreResult<()>;
}

impl<S: TaskStore + ?Sized> TaskStore for &S {
    fn query(&self, owner_id: &str) -> StoreResult<Vec<Task>> {
        (**self).query(owner_id)
    }

    fn create(&self, new_task: &NewTask) -> StoreResult<TaskId> {
        (**self).create(new_task)
    }

    fn update(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<()> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: TaskId) -> StoreResult<()> {
        (**self).delete(id)
    }
}

impl<S: TaskStore + ?Sized> TaskStore for Box<S> {
    fn query(&self, owner_id: &str) -> StoreResult<Vec<Task>> {
        (**self).query(owner_id)
    }

    fn create(&self, new_task: &NewTask) -> StoreResult<TaskId> {
        (**self).create(new_task)
    }

    fn update(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<()> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: TaskId) -> StoreResult<()> {
        (**self).delete(id)
    }
}
