//! Pending new-task input.

use crate::model::task::Priority;

/// Text and priority typed (or dictated) for the next task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    text: String,
    priority: Priority,
}

impl TaskDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the whole text; dictation results overwrite, never append.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Whether submitting would be rejected as empty.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Resets text and priority after a successful add.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
