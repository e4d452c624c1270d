use minitodo_core::db::open_db_in_memory;
use minitodo_core::{
    FixedClock, InMemoryTaskStore, NewTask, Priority, SqliteTaskStore, StoreError, StoreResult,
    Task, TaskFilter, TaskId, TaskListController, TaskPatch, TaskStore,
};
use std::cell::Cell;
use uuid::Uuid;

fn controller() -> TaskListController<InMemoryTaskStore> {
    TaskListController::with_clock(InMemoryTaskStore::new(), FixedClock(1_700_000_000_000))
}

fn texts(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.text.as_str()).collect()
}

/// Wraps a store and fails selected calls on demand.
#[derive(Default)]
struct FlakyStore {
    inner: InMemoryTaskStore,
    fail_query: Cell<bool>,
    fail_writes: Cell<bool>,
}

impl FlakyStore {
    fn outage() -> StoreError {
        StoreError::Backend("simulated outage".to_string())
    }
}

impl TaskStore for FlakyStore {
    fn query(&self, owner_id: &str) -> StoreResult<Vec<Task>> {
        if self.fail_query.get() {
            return Err(Self::outage());
        }
        self.inner.query(owner_id)
    }

    fn create(&self, new_task: &NewTask) -> StoreResult<TaskId> {
        if self.fail_writes.get() {
            return Err(Self::outage());
        }
        self.inner.create(new_task)
    }

    fn update(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(Self::outage());
        }
        self.inner.update(id, patch)
    }

    fn delete(&self, id: TaskId) -> StoreResult<()> {
        if self.fail_writes.get() {
            return Err(Self::outage());
        }
        self.inner.delete(id)
    }
}

#[test]
fn add_then_load_yields_exactly_one_new_task() {
    let mut list = controller();
    list.load("u1").unwrap();
    let id = list
        .add("u1", "Buy milk", Some(Priority::High))
        .unwrap()
        .expect("task created");

    let tasks = list.load("u1").unwrap().to_vec();
    assert_eq!(tasks.len(), 1);
    let task = &tasks[0];
    assert_eq!(task.id, id);
    assert_eq!(task.text, "Buy milk");
    assert!(!task.completed);
    assert_eq!(task.priority, Priority::High);
    assert_eq!(task.owner_id, "u1");
    assert_eq!(task.created_at, 1_700_000_000_000);
}

#[test]
fn add_defaults_priority_to_medium_and_reloads() {
    let mut list = controller();
    list.add("u1", "Call mom", None).unwrap();
    assert_eq!(list.tasks().len(), 1);
    assert_eq!(list.tasks()[0].priority, Priority::Medium);
    assert_eq!(list.owner_id(), Some("u1"));
}

#[test]
fn blank_add_is_a_no_op() {
    let mut list = controller();
    list.add("u1", "keep", None).unwrap();

    assert_eq!(list.add("u1", "", None).unwrap(), None);
    assert_eq!(list.add("u1", "   ", Some(Priority::High)).unwrap(), None);
    assert_eq!(list.tasks().len(), 1);
    assert_eq!(list.store().len(), 1);
}

#[test]
fn toggle_twice_restores_original_value() {
    let mut list = controller();
    let id = list.add("u1", "flip", None).unwrap().unwrap();

    assert!(list.toggle_completed(id).unwrap());
    assert!(list.find(id).unwrap().completed);
    assert!(list.toggle_completed(id).unwrap());
    assert!(!list.find(id).unwrap().completed);
}

#[test]
fn toggle_of_unknown_id_is_a_no_op() {
    let mut list = controller();
    list.add("u1", "only", None).unwrap();
    assert!(!list.toggle_completed(Uuid::new_v4()).unwrap());
    assert!(!list.tasks()[0].completed);
}

#[test]
fn delete_removes_task_and_repeat_delete_is_a_no_op() {
    let mut list = controller();
    let keep = list.add("u1", "keep", None).unwrap().unwrap();
    let gone = list.add("u1", "drop", None).unwrap().unwrap();

    assert!(list.delete(gone).unwrap());
    let ids: Vec<TaskId> = list.load("u1").unwrap().iter().map(|task| task.id).collect();
    assert_eq!(ids, vec![keep]);

    assert!(!list.delete(gone).unwrap());
    assert_eq!(list.tasks().len(), 1);
}

#[test]
fn tasks_of_other_owners_cannot_be_toggled_or_deleted() {
    let store = InMemoryTaskStore::new();
    let foreign = store
        .create(&NewTask::new("u2", "not yours", Priority::Low, 0).unwrap())
        .unwrap();
    let mut list = TaskListController::new(&store);
    list.load("u1").unwrap();

    assert!(!list.toggle_completed(foreign).unwrap());
    assert!(!list.delete(foreign).unwrap());
    let theirs = store.query("u2").unwrap();
    assert_eq!(theirs.len(), 1);
    assert!(!theirs[0].completed);
}

#[test]
fn sort_by_priority_is_stable_and_never_writes_to_store() {
    let mut list = TaskListController::new(SqliteTaskStore::new(open_db_in_memory().unwrap()));
    let mut clock_ms = 0;
    for (text, priority) in [
        ("low", Priority::Low),
        ("high-1", Priority::High),
        ("medium", Priority::Medium),
        ("high-2", Priority::High),
    ] {
        clock_ms += 1;
        list.store()
            .create(&NewTask::new("u1", text, priority, clock_ms).unwrap())
            .unwrap();
    }
    list.load("u1").unwrap();
    assert_eq!(texts(list.tasks()), vec!["low", "high-1", "medium", "high-2"]);

    list.sort_by_priority();
    assert_eq!(texts(list.tasks()), vec!["high-1", "high-2", "medium", "low"]);

    list.load("u1").unwrap();
    assert_eq!(texts(list.tasks()), vec!["low", "high-1", "medium", "high-2"]);
}

#[test]
fn filters_are_read_only_views() {
    let mut list = controller();
    let done = list.add("u1", "done", Some(Priority::High)).unwrap().unwrap();
    list.add("u1", "open", Some(Priority::Low)).unwrap();
    list.toggle_completed(done).unwrap();

    assert_eq!(list.filter(TaskFilter::All).len(), 2);
    let active = list.filter(TaskFilter::Active);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].text, "open");
    let completed = list.filter(TaskFilter::Completed);
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, done);
    assert_eq!(list.with_priority(Priority::Low).len(), 1);
    assert!(list.with_priority(Priority::Medium).is_empty());
}

#[test]
fn failed_write_keeps_prior_collection() {
    let mut list = TaskListController::new(FlakyStore::default());
    let id = list.add("u1", "stable", None).unwrap().unwrap();
    let before = list.tasks().to_vec();

    list.store().fail_writes.set(true);
    assert!(list.add("u1", "lost", None).is_err());
    assert!(list.toggle_completed(id).is_err());
    assert!(list.delete(id).is_err());
    assert_eq!(list.tasks(), before.as_slice());
}

#[test]
fn failed_reload_after_write_keeps_prior_collection() {
    let mut list = TaskListController::new(FlakyStore::default());
    let id = list.add("u1", "stable", None).unwrap().unwrap();
    let before = list.tasks().to_vec();

    list.store().fail_query.set(true);
    let err = list.toggle_completed(id).unwrap_err();
    assert!(matches!(err, StoreError::Backend(_)));
    assert_eq!(list.tasks(), before.as_slice());

    list.store().fail_query.set(false);
    list.load("u1").unwrap();
    assert!(list.find(id).unwrap().completed);
}

#[test]
fn clear_drops_cache_and_owner() {
    let mut list = controller();
    list.add("u1", "cached", None).unwrap();
    list.clear();
    assert!(list.tasks().is_empty());
    assert_eq!(list.owner_id(), None);
}
