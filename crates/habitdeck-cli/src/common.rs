//! Shared helpers for CLI commands.

use habitdeck_core::storage::{Snapshot, StateStore};
use habitdeck_core::{GoalBoard, HabitLedger, TodoList};

/// Live application state plus the store it came from.
pub struct AppState {
    pub store: StateStore,
    pub ledger: HabitLedger,
    pub todos: TodoList,
    pub goals: GoalBoard,
}

impl AppState {
    /// Load the snapshot from the default store.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let store = StateStore::open()?;
        let (ledger, todos, goals) = store.load().into_state();
        Ok(AppState {
            store,
            ledger,
            todos,
            goals,
        })
    }

    /// Write the current state back as one snapshot.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let snapshot = Snapshot::from_state(&self.ledger, &self.todos, &self.goals);
        self.store.save(&snapshot)?;
        Ok(())
    }
}
