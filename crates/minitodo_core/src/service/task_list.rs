//! Task list controller.
//!
//! # Responsibility
//! - Hold the signed-in owner's task collection in memory.
//! - Write mutations through the store, then reload the collection.
//! - Provide in-memory priority sort and read-only views.
//!
//! # Invariants
//! - The collection only ever holds tasks of the last loaded owner.
//! - A failed store call leaves the collection exactly as it was.
//! - Toggle and delete only act on tasks present in the collection.

use crate::model::task::{NewTask, Priority, Task, TaskId, TaskPatch, TaskValidationError};
use crate::repo::task_store::{StoreResult, TaskStore};
use crate::service::clock::{Clock, SystemClock};
use log::{debug, error, info};
use std::time::Instant;

/// Completion view over the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TaskFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "active" | "pending" => Some(Self::Active),
            "completed" | "done" => Some(Self::Completed),
            _ => None,
        }
    }

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }
}

/// In-memory task collection for one owner, backed by a `TaskStore`.
pub struct TaskListController<S: TaskStore> {
    store: S,
    clock: Box<dyn Clock + Send>,
    owner_id: Option<String>,
    tasks: Vec<Task>,
}

impl<S: TaskStore> TaskListController<S> {
    /// Creates a controller stamping tasks with the system clock.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }

    pub fn with_clock(store: S, clock: impl Clock + Send + 'static) -> Self {
        Self {
            store,
            clock: Box::new(clock),
            owner_id: None,
            tasks: Vec::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Owner of the currently cached collection.
    pub fn owner_id(&self) -> Option<&str> {
        self.owner_id.as_deref()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Replaces the collection with every task owned by `owner_id`.
    ///
    /// The returned order is whatever the store produced.
    pub fn load(&mut self, owner_id: &str) -> StoreResult<&[Task]> {
        let started_at = Instant::now();
        match self.store.query(owner_id) {
            Ok(tasks) => {
                debug!(
                    "event=task_load module=task_list status=ok count={} duration_ms={}",
                    tasks.len(),
                    started_at.elapsed().as_millis()
                );
                self.tasks = tasks;
                self.owner_id = Some(owner_id.to_string());
                Ok(&self.tasks)
            }
            Err(err) => {
                error!(
                    "event=task_load module=task_list status=error duration_ms={} error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err)
            }
        }
    }

    /// Creates a task and reloads the owner's collection.
    ///
    /// Returns `Ok(None)` without touching the store when `text` is blank.
    /// `priority` defaults to medium.
    pub fn add(
        &mut self,
        owner_id: &str,
        text: &str,
        priority: Option<Priority>,
    ) -> StoreResult<Option<TaskId>> {
        let priority = priority.unwrap_or_default();
        let new_task = match NewTask::new(owner_id, text, priority, self.clock.now_epoch_ms()) {
            Ok(new_task) => new_task,
            Err(TaskValidationError::EmptyText) => {
                debug!("event=task_add module=task_list status=skipped reason=empty_text");
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };

        let id = self.store.create(&new_task).map_err(|err| {
            error!("event=task_add module=task_list status=error error={err}");
            err
        })?;
        info!("event=task_add module=task_list status=ok task_id={id} priority={priority}");

        self.load(owner_id)?;
        Ok(Some(id))
    }

    /// Flips `completed` on a cached task and reloads.
    ///
    /// Returns `Ok(false)` when `id` is not in the collection.
    pub fn toggle_completed(&mut self, id: TaskId) -> StoreResult<bool> {
        let Some(task) = self.find(id) else {
            debug!("event=task_toggle module=task_list status=skipped reason=not_loaded task_id={id}");
            return Ok(false);
        };
        let owner_id = task.owner_id.clone();
        let completed = !task.completed;

        self.store
            .update(id, &TaskPatch::completed(completed))
            .map_err(|err| {
                error!("event=task_toggle module=task_list status=error task_id={id} error={err}");
                err
            })?;
        info!("event=task_toggle module=task_list status=ok task_id={id} completed={completed}");

        self.load(&owner_id)?;
        Ok(true)
    }

    /// Permanently deletes a cached task and reloads.
    ///
    /// Returns `Ok(false)` when `id` is not in the collection, so repeated
    /// deletes are no-ops.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<bool> {
        let Some(task) = self.find(id) else {
            debug!("event=task_delete module=task_list status=skipped reason=not_loaded task_id={id}");
            return Ok(false);
        };
        let owner_id = task.owner_id.clone();

        self.store.delete(id).map_err(|err| {
            error!("event=task_delete module=task_list status=error task_id={id} error={err}");
            err
        })?;
        info!("event=task_delete module=task_list status=ok task_id={id}");

        self.load(&owner_id)?;
        Ok(true)
    }

    /// Reorders the cached collection high -> medium -> low.
    ///
    /// Stable for equal priorities; nothing is written to the store.
    pub fn sort_by_priority(&mut self) {
        self.tasks.sort_by_key(|task| task.priority);
    }

    pub fn filter(&self, filter: TaskFilter) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| filter.matches(task))
            .collect()
    }

    pub fn with_priority(&self, priority: Priority) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|task| task.priority == priority)
            .collect()
    }

    /// Drops the cached collection and owner.
    pub fn clear(&mut self) {
        self.tasks.clear();
        self.owner_id = None;
    }
}
