//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record persisted by every `TaskStore`.
//! - Validate creation input before it reaches persistence.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another task.
//! - `owner_id` is set once at creation and never changes.
//! - `text` is stored trimmed and is never empty.
//! - `completed` is the only field mutable after creation.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned by the store on creation.
pub type TaskId = Uuid;

/// Priority tag attached to every task.
///
/// Ordering follows display order: `High` sorts before `Medium`, which sorts
/// before `Low`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Stable lowercase value used in storage and external payloads.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parses a stored or user-supplied value (case-insensitive, trimmed).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl Ord for Priority {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Priority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation errors for task creation input and persisted rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Text is empty after trimming whitespace.
    EmptyText,
    /// Owner id is empty after trimming whitespace.
    EmptyOwner,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "task text must not be empty"),
            Self::EmptyOwner => write!(f, "task owner id must not be empty"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task document.
///
/// Serialized with the external document field names
/// (`id`, `text`, `completed`, `priority`, `ownerId`, `createdAt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub owner_id: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
}

impl Task {
    /// Materializes a stored task from a validated draft and store-assigned id.
    pub fn from_new(id: TaskId, new_task: &NewTask) -> Self {
        Self {
            id,
            text: new_task.text.clone(),
            completed: new_task.completed,
            priority: new_task.priority,
            owner_id: new_task.owner_id.clone(),
            created_at: new_task.created_at,
        }
    }

    /// Validates invariants shared by writes and persisted reads.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_fields(&self.owner_id, &self.text)
    }

    /// Returns whether this task is owned by `owner_id`.
    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }
}

/// Task fields minus the store-assigned id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub owner_id: String,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub created_at: i64,
}

impl NewTask {
    /// Builds creation input with `completed = false`.
    ///
    /// Text is trimmed before storage.
    ///
    /// # Errors
    /// - `EmptyText` when `text` is blank.
    /// - `EmptyOwner` when `owner_id` is blank.
    pub fn new(
        owner_id: impl Into<String>,
        text: &str,
        priority: Priority,
        created_at: i64,
    ) -> Result<Self, TaskValidationError> {
        let owner_id = owner_id.into();
        let text = text.trim().to_string();
        validate_fields(&owner_id, &text)?;
        Ok(Self {
            owner_id,
            text,
            completed: false,
            priority,
            created_at,
        })
    }

    pub fn validate(&self) -> Result<(), TaskValidationError> {
        validate_fields(&self.owner_id, &self.text)
    }
}

/// Partial update applied by `TaskStore::update`.
///
/// `completed` is the only field mutable after creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub completed: Option<bool>,
}

impl TaskPatch {
    pub fn completed(value: bool) -> Self {
        Self {
            completed: Some(value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_none()
    }

    /// Applies set fields onto `task`.
    pub fn apply(&self, task: &mut Task) {
        if let Some(completed) = self.completed {
            task.completed = completed;
        }
    }
}

fn validate_fields(owner_id: &str, text: &str) -> Result<(), TaskValidationError> {
    if owner_id.trim().is_empty() {
        return Err(TaskValidationError::EmptyOwner);
    }
    if text.trim().is_empty() {
        return Err(TaskValidationError::EmptyText);
    }
    Ok(())
}
