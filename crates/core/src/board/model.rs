//! Board model definitions
//!
//! Columns, tasks and attachments in the wire-compatible format the clients
//! expect, plus the pure in-memory [`BoardState`] they live in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Task priority level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        Self::Medium
    }
}

/// Task category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Bug,
    Feature,
    Enhancement,
}

impl Default for TaskCategory {
    fn default() -> Self {
        Self::Feature
    }
}

/// An opaque file descriptor attached to a task. Immutable once created.
///
/// The wire format keeps the client's original field names: the MIME type
/// travels as `type` and the byte size as `size`. `url` may be empty for
/// non-previewable types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(rename = "size")]
    pub size_bytes: u64,
    #[serde(default)]
    pub url: String,
}

/// A task on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub column_id: String,
    pub position: u32,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub category: TaskCategory,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// A column on the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub id: String,
    pub title: String,
    pub position: u32,
}

/// Fields for a task that does not exist yet. The store assigns the id and
/// the position.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub title: String,
    pub column_id: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub category: TaskCategory,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// Partial task update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub column_id: Option<String>,
    #[serde(default)]
    pub position: Option<u32>,
    #[serde(default)]
    pub priority: Option<TaskPriority>,
    #[serde(default)]
    pub category: Option<TaskCategory>,
    #[serde(default)]
    pub attachments: Option<Vec<Attachment>>,
}

/// Partial column update; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ColumnPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub position: Option<u32>,
}

/// The full board at a point in time: columns ordered by position, tasks
/// unordered. Consumers sort tasks by `position` themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub columns: Vec<Column>,
    pub tasks: Vec<Task>,
}

/// The complete mutable board state
#[derive(Debug, Clone)]
pub struct BoardState {
    pub columns: HashMap<String, Column>,
    pub tasks: HashMap<String, Task>,
}

impl Default for BoardState {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardState {
    /// Create a board with the three seed columns and no tasks
    pub fn new() -> Self {
        let mut columns = HashMap::new();
        for (id, title, position) in [
            ("todo", "To Do", 0),
            ("in-progress", "In Progress", 1),
            ("done", "Done", 2),
        ] {
            columns.insert(
                id.to_string(),
                Column {
                    id: id.to_string(),
                    title: title.to_string(),
                    position,
                },
            );
        }

        Self {
            columns,
            tasks: HashMap::new(),
        }
    }

    /// All columns, position ascending
    pub fn columns_ordered(&self) -> Vec<Column> {
        let mut columns: Vec<Column> = self.columns.values().cloned().collect();
        columns.sort_by_key(|column| column.position);
        columns
    }

    /// All tasks, unordered
    pub fn all_tasks(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }

    /// Tasks whose `column_id` matches, position ascending
    pub fn tasks_in_column(&self, column_id: &str) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .values()
            .filter(|task| task.column_id == column_id)
            .cloned()
            .collect();
        tasks.sort_by_key(|task| task.position);
        tasks
    }

    /// Get a task by id
    pub fn get_task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    /// Get a column by id
    pub fn get_column(&self, id: &str) -> Option<&Column> {
        self.columns.get(id)
    }

    /// Create a task with the given id. The position appends to the target
    /// column as currently populated, regardless of gaps left by earlier
    /// deletions. Returns `None` if the column does not exist.
    pub fn create_task(&mut self, id: String, draft: NewTask) -> Option<Task> {
        if !self.columns.contains_key(&draft.column_id) {
            return None;
        }

        let position = self
            .tasks
            .values()
            .filter(|task| task.column_id == draft.column_id)
            .count() as u32;

        let task = Task {
            id: id.clone(),
            title: draft.title,
            description: draft.description,
            column_id: draft.column_id,
            position,
            priority: draft.priority,
            category: draft.category,
            attachments: draft.attachments,
        };
        self.tasks.insert(id, task.clone());
        Some(task)
    }

    /// Shallow-merge the patch over an existing task. A patched `column_id`
    /// is taken as-is, even when no such column exists.
    pub fn update_task(&mut self, id: &str, patch: TaskPatch) -> Option<Task> {
        let task = self.tasks.get_mut(id)?;

        if let Some(title) = patch.title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = Some(description);
        }
        if let Some(column_id) = patch.column_id {
            task.column_id = column_id;
        }
        if let Some(position) = patch.position {
            task.position = position;
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(category) = patch.category {
            task.category = category;
        }
        if let Some(attachments) = patch.attachments {
            task.attachments = attachments;
        }

        Some(task.clone())
    }

    /// Overwrite a task's column and position. Sibling positions in the
    /// source and destination columns are left untouched, so repeated moves
    /// can leave duplicate or out-of-order positions.
    pub fn move_task(&mut self, id: &str, column_id: &str, position: u32) -> Option<Task> {
        let task = self.tasks.get_mut(id)?;
        task.column_id = column_id.to_string();
        task.position = position;
        Some(task.clone())
    }

    /// Remove a task. Returns whether it existed.
    pub fn delete_task(&mut self, id: &str) -> bool {
        self.tasks.remove(id).is_some()
    }

    /// Create a column with the given id, appended after the existing ones
    pub fn create_column(&mut self, id: String, title: String) -> Column {
        let column = Column {
            id: id.clone(),
            title,
            position: self.columns.len() as u32,
        };
        self.columns.insert(id, column.clone());
        column
    }

    /// Shallow-merge the patch over an existing column
    pub fn update_column(&mut self, id: &str, patch: ColumnPatch) -> Option<Column> {
        let column = self.columns.get_mut(id)?;

        if let Some(title) = patch.title {
            column.title = title;
        }
        if let Some(position) = patch.position {
            column.position = position;
        }

        Some(column.clone())
    }

    /// Remove a column. Its tasks stay in place with their old `column_id`;
    /// they surface only in the unfiltered task list afterwards.
    pub fn delete_column(&mut self, id: &str) -> bool {
        self.columns.remove(id).is_some()
    }

    /// Assign positions 0..n following the given id order. Unknown ids are
    /// skipped.
    pub fn reorder_tasks(&mut self, ordered_ids: &[String]) {
        for (index, id) in ordered_ids.iter().enumerate() {
            if let Some(task) = self.tasks.get_mut(id) {
                task.position = index as u32;
            }
        }
    }

    /// The full board state for resynchronization
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            columns: self.columns_ordered(),
            tasks: self.all_tasks(),
        }
    }
}
