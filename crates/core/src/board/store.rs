//! Authoritative board store
//!
//! A thread-safe handle over [`BoardState`]. The write lock is the single
//! serialization point: mutations are applied one at a time, in lock
//! acquisition order, and every operation completes synchronously in memory.
//! State lives only in the process; a restart resets to the seed columns.

use std::sync::Arc;
use tokio::sync::RwLock;

use super::model::{
    BoardSnapshot, BoardState, Column, ColumnPatch, NewTask, Task, TaskPatch,
};

/// Shared handle to the single source of truth for the board
#[derive(Clone)]
pub struct BoardStore {
    state: Arc<RwLock<BoardState>>,
}

impl Default for BoardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardStore {
    /// Create a store seeded with the default columns
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(BoardState::new())),
        }
    }

    /// The full board state for resynchronization
    pub async fn snapshot(&self) -> BoardSnapshot {
        self.state.read().await.snapshot()
    }

    /// All columns, position ascending
    pub async fn list_columns(&self) -> Vec<Column> {
        self.state.read().await.columns_ordered()
    }

    /// All tasks, unordered
    pub async fn list_tasks(&self) -> Vec<Task> {
        self.state.read().await.all_tasks()
    }

    /// Tasks in one column, position ascending
    pub async fn tasks_in_column(&self, column_id: &str) -> Vec<Task> {
        self.state.read().await.tasks_in_column(column_id)
    }

    /// Look up a task by id
    pub async fn get_task(&self, id: &str) -> Option<Task> {
        self.state.read().await.get_task(id).cloned()
    }

    /// Look up a column by id
    pub async fn get_column(&self, id: &str) -> Option<Column> {
        self.state.read().await.get_column(id).cloned()
    }

    /// Create a task appended to its column. Returns `None` if the target
    /// column does not exist.
    pub async fn create_task(&self, draft: NewTask) -> Option<Task> {
        let id = fresh_id("task");
        self.state.write().await.create_task(id, draft)
    }

    /// Shallow-merge the patch over an existing task
    pub async fn update_task(&self, id: &str, patch: TaskPatch) -> Option<Task> {
        self.state.write().await.update_task(id, patch)
    }

    /// Overwrite a task's column and position without touching its siblings
    pub async fn move_task(&self, id: &str, column_id: &str, position: u32) -> Option<Task> {
        self.state.write().await.move_task(id, column_id, position)
    }

    /// Remove a task. Returns whether it existed.
    pub async fn delete_task(&self, id: &str) -> bool {
        self.state.write().await.delete_task(id)
    }

    /// Create a column appended after the existing ones
    pub async fn create_column(&self, title: &str) -> Column {
        let id = fresh_id("column");
        self.state.write().await.create_column(id, title.to_string())
    }

    /// Shallow-merge the patch over an existing column
    pub async fn update_column(&self, id: &str, patch: ColumnPatch) -> Option<Column> {
        self.state.write().await.update_column(id, patch)
    }

    /// Remove a column. Its tasks are neither deleted nor reassigned.
    pub async fn delete_column(&self, id: &str) -> bool {
        self.state.write().await.delete_column(id)
    }

    /// Assign positions 0..n following the given id order
    pub async fn reorder_tasks(&self, ordered_ids: &[String]) {
        self.state.write().await.reorder_tasks(ordered_ids)
    }
}

/// Entity ids are assigned once at creation and never change.
fn fresh_id(prefix: &str) -> String {
    format!(
        "{}-{}-{}",
        prefix,
        chrono::Utc::now().timestamp_millis(),
        uuid::Uuid::new_v4()
            .to_string()
            .split('-')
            .next()
            .unwrap_or("0000")
    )
}
