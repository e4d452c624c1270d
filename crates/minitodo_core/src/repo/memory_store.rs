//! In-memory `TaskStore` for tests and embedding without a database.

use crate::model::task::{NewTask, Task, TaskId, TaskPatch};
use crate::repo::task_store::{StoreError, StoreResult, TaskStore};
use std::cell::RefCell;
use std::collections::BTreeMap;
use uuid::Uuid;

/// Volatile task collection. Single-threaded, like the controller using it.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RefCell<BTreeMap<TaskId, Task>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks across all owners.
    pub fn len(&self) -> usize {
        self.tasks.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.borrow().is_empty()
    }

    /// Inserts a fully formed task, replacing any task with the same id.
    pub fn insert(&self, task: Task) {
        self.tasks.borrow_mut().insert(task.id, task);
    }
}

impl TaskStore for InMemoryTaskStore {
    fn query(&self, owner_id: &str) -> StoreResult<Vec<Task>> {
        Ok(self
            .tasks
            .borrow()
            .values()
            .filter(|task| task.is_owned_by(owner_id))
            .cloned()
            .collect())
    }

    fn create(&self, new_task: &NewTask) -> StoreResult<TaskId> {
        new_task.validate()?;
        let id = Uuid::new_v4();
        self.insert(Task::from_new(id, new_task));
        Ok(id)
    }

    fn update(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<()> {
        let mut tasks = self.tasks.borrow_mut();
        let task = tasks.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        patch.apply(task);
        Ok(())
    }

    fn delete(&self, id: TaskId) -> StoreResult<()> {
        self.tasks.borrow_mut().remove(&id);
        Ok(())
    }
}
