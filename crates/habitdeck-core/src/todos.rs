//! Quick to-do list with progress sliders and a restorable history of
//! deleted items.
//!
//! Ordering rule: completed items sink below active ones; un-completing an
//! item moves it back to the front. Deleting moves the item into history
//! (with its deletion instant) instead of discarding it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::habits::fresh_id;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    /// 0..=100, stepped by the slider and rounded on write.
    #[serde(default)]
    pub progress: u8,
}

impl Todo {
    pub fn new(title: impl Into<String>) -> Self {
        Todo {
            id: fresh_id("todo"),
            title: title.into(),
            done: false,
            progress: 0,
        }
    }
}

/// A deleted todo retained in history. Identity in history is the
/// `(id, deleted_at)` pair, since the same todo can be deleted and restored
/// more than once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedTodo {
    #[serde(flatten)]
    pub todo: Todo,
    pub deleted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodoList {
    todos: Vec<Todo>,
    history: Vec<DeletedTodo>,
}

impl TodoList {
    pub fn new(todos: Vec<Todo>, history: Vec<DeletedTodo>) -> Self {
        TodoList { todos, history }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn history(&self) -> &[DeletedTodo] {
        &self.history
    }

    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.todos.iter().find(|t| t.id == id)
    }

    /// Count of items not yet done ("N tasks left").
    pub fn remaining_count(&self) -> usize {
        self.todos.iter().filter(|t| !t.done).count()
    }

    /// Add a new todo at the front. Trims the title and rejects empty input.
    pub fn add(&mut self, title: &str) -> Result<&Todo, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        self.todos.insert(0, Todo::new(title));
        Ok(&self.todos[0])
    }

    /// Toggle done state and re-slot the item: newly-done sinks to just
    /// above the completed block, newly-active returns to the front.
    /// Unknown ids are a no-op.
    pub fn toggle(&mut self, id: &str) {
        let Some(index) = self.todos.iter().position(|t| t.id == id) else {
            return;
        };
        let mut toggled = self.todos.remove(index);
        toggled.done = !toggled.done;

        if toggled.done {
            let first_done = self
                .todos
                .iter()
                .position(|t| t.done)
                .unwrap_or(self.todos.len());
            self.todos.insert(first_done, toggled);
        } else {
            self.todos.insert(0, toggled);
        }
    }

    /// Set progress, clamped to 0..=100. Unknown ids are a no-op.
    pub fn set_progress(&mut self, id: &str, progress: u8) {
        if let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) {
            todo.progress = progress.min(100);
        }
    }

    /// Move a todo into history, stamped with the deletion instant.
    /// Unknown ids are a no-op.
    pub fn remove(&mut self, id: &str) {
        let Some(index) = self.todos.iter().position(|t| t.id == id) else {
            return;
        };
        let todo = self.todos.remove(index);
        self.history.insert(
            0,
            DeletedTodo {
                todo,
                deleted_at: Utc::now(),
            },
        );
    }

    /// Restore a history entry to the front of the list, not done, progress
    /// preserved. The entry is matched by its `(id, deleted_at)` pair.
    pub fn restore(&mut self, id: &str, deleted_at: DateTime<Utc>) {
        let Some(index) = self
            .history
            .iter()
            .position(|e| e.todo.id == id && e.deleted_at == deleted_at)
        else {
            return;
        };
        let entry = self.history.remove(index);
        self.todos.insert(
            0,
            Todo {
                done: false,
                ..entry.todo
            },
        );
    }

    /// Discard a history entry for good.
    pub fn purge(&mut self, id: &str, deleted_at: DateTime<Utc>) {
        self.history
            .retain(|e| !(e.todo.id == id && e.deleted_at == deleted_at));
    }
}
