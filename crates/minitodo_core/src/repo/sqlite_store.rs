//! SQLite-backed `TaskStore`.
//!
//! # Invariants
//! - Write paths validate before SQL mutations.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::model::task::{NewTask, Priority, Task, TaskId, TaskPatch};
use crate::repo::task_store::{StoreError, StoreResult, TaskStore};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

const TASK_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    text,
    completed,
    priority,
    created_at
FROM tasks";

/// Task store over a migrated SQLite connection.
///
/// Owns its connection so it can live inside long-lived app state.
pub struct SqliteTaskStore {
    conn: Connection,
}

impl SqliteTaskStore {
    /// Wraps a connection returned by `db::open_db*`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn exists(&self, id: TaskId) -> StoreResult<bool> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM tasks WHERE id = ?1;",
            [id.to_string()],
            |row| row.get::<_, i64>(0),
        )?;
        Ok(count > 0)
    }

    /// Loads one task by id regardless of owner.
    pub fn get(&self, id: TaskId) -> StoreResult<Option<Task>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_task_row(row)?)),
            None => Ok(None),
        }
    }
}

impl TaskStore for SqliteTaskStore {
    fn query(&self, owner_id: &str) -> StoreResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TASK_SELECT_SQL} WHERE owner_id = ?1 ORDER BY created_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }

    fn create(&self, new_task: &NewTask) -> StoreResult<TaskId> {
        new_task.validate()?;

        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO tasks (id, owner_id, text, completed, priority, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                id.to_string(),
                new_task.owner_id.as_str(),
                new_task.text.as_str(),
                new_task.completed,
                new_task.priority.as_str(),
                new_task.created_at,
            ],
        )?;
        Ok(id)
    }

    fn update(&self, id: TaskId, patch: &TaskPatch) -> StoreResult<()> {
        let changed = match patch.completed {
            Some(completed) => self.conn.execute(
                "UPDATE tasks SET completed = ?1 WHERE id = ?2;",
                params![completed, id.to_string()],
            )?,
            None => usize::from(self.exists(id)?),
        };

        if changed == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    fn delete(&self, id: TaskId) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM tasks WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> StoreResult<Task> {
    let id_text: String = row.get("id")?;
    let id = Uuid::parse_str(&id_text)
        .map_err(|_| StoreError::InvalidData(format!("invalid id `{id_text}` in tasks.id")))?;

    let priority_text: String = row.get("priority")?;
    let priority = Priority::parse(&priority_text).ok_or_else(|| {
        StoreError::InvalidData(format!(
            "invalid priority `{priority_text}` in tasks.priority"
        ))
    })?;

    let completed = match row.get::<_, i64>("completed")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid completed value `{other}` in tasks.completed"
            )));
        }
    };

    let task = Task {
        id,
        text: row.get("text")?,
        completed,
        priority,
        owner_id: row.get("owner_id")?,
        created_at: row.get("created_at")?,
    };
    task.validate()?;
    Ok(task)
}
