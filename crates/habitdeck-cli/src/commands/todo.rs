//! To-do list commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum TodoAction {
    /// Add a new to-do
    Add {
        /// To-do title
        title: String,
    },
    /// List to-dos
    List,
    /// Toggle a to-do between done and active
    Toggle {
        /// To-do ID
        id: String,
    },
    /// Set progress (0-100)
    Progress {
        /// To-do ID
        id: String,
        /// Progress value
        value: u8,
    },
    /// Delete a to-do (moves it to history)
    Delete {
        /// To-do ID
        id: String,
    },
    /// Show deleted to-dos
    History,
    /// Restore a deleted to-do
    Restore {
        /// To-do ID
        id: String,
        /// Deletion instant (RFC 3339), defaults to the most recent entry
        #[arg(long)]
        deleted_at: Option<String>,
    },
    /// Permanently remove a history entry
    Purge {
        /// To-do ID
        id: String,
        /// Deletion instant (RFC 3339), defaults to the most recent entry
        #[arg(long)]
        deleted_at: Option<String>,
    },
}

pub fn run(action: TodoAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = crate::common::AppState::load()?;

    match action {
        TodoAction::Add { title } => {
            let todo = state.todos.add(&title)?;
            println!("To-do created: {}", todo.id);
            state.save()?;
        }
        TodoAction::List => {
            for todo in state.todos.todos() {
                let mark = if todo.done { "x" } else { " " };
                println!("[{mark}] {}  ({}%)  {}", todo.title, todo.progress, todo.id);
            }
            println!("{} tasks left", state.todos.remaining_count());
        }
        TodoAction::Toggle { id } => {
            if state.todos.get(&id).is_none() {
                return Err(format!("To-do not found: {id}").into());
            }
            state.todos.toggle(&id);
            state.save()?;
        }
        TodoAction::Progress { id, value } => {
            if state.todos.get(&id).is_none() {
                return Err(format!("To-do not found: {id}").into());
            }
            state.todos.set_progress(&id, value);
            state.save()?;
        }
        TodoAction::Delete { id } => {
            if state.todos.get(&id).is_none() {
                return Err(format!("To-do not found: {id}").into());
            }
            state.todos.remove(&id);
            println!("To-do deleted: {id}");
            state.save()?;
        }
        TodoAction::History => {
            println!("{}", serde_json::to_string_pretty(state.todos.history())?);
        }
        TodoAction::Restore { id, deleted_at } => {
            let stamp = resolve_entry(&state, &id, deleted_at.as_deref())?;
            state.todos.restore(&id, stamp);
            println!("To-do restored: {id}");
            state.save()?;
        }
        TodoAction::Purge { id, deleted_at } => {
            let stamp = resolve_entry(&state, &id, deleted_at.as_deref())?;
            state.todos.purge(&id, stamp);
            println!("History entry removed: {id}");
            state.save()?;
        }
    }
    Ok(())
}

/// Pick the history entry to act on. Without an explicit instant, the most
/// recently deleted entry with this id wins (history is newest-first).
fn resolve_entry(
    state: &crate::common::AppState,
    id: &str,
    deleted_at: Option<&str>,
) -> Result<DateTime<Utc>, Box<dyn std::error::Error>> {
    if let Some(text) = deleted_at {
        let stamp: DateTime<Utc> = text
            .parse()
            .map_err(|_| format!("invalid deletion instant: {text}"))?;
        return Ok(stamp);
    }
    state
        .todos
        .history()
        .iter()
        .find(|e| e.todo.id == id)
        .map(|e| e.deleted_at)
        .ok_or_else(|| format!("No history entry for: {id}").into())
}
