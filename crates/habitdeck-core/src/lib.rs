//! # Habitdeck Core Library
//!
//! This library provides the core logic for the habitdeck habit tracker.
//! It implements a CLI-first philosophy where all operations are available
//! via a standalone CLI binary; any GUI would be a thin layer over the same
//! core library.
//!
//! ## Architecture
//!
//! - **Habit Ledger**: Ordered habit tasks with per-day completion records
//!   and notes, plus calendar views derived from them
//! - **Hold Tracker**: A wall-clock state machine gating completion behind a
//!   sustained hold; the caller periodically invokes `tick()`
//! - **Todos & Goals**: A quick to-do list with restorable history, and a
//!   goal board with duration presets and a progress dial
//! - **Storage**: Single-snapshot JSON persistence and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`HabitLedger`]: Habit state and calendar windows
//! - [`HoldTracker`]: Hold-to-complete gesture state machine
//! - [`CheckSession`]: View state tying the ledger and the gesture together
//! - [`StateStore`]: Snapshot persistence
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod error;
pub mod events;
pub mod goals;
pub mod habits;
pub mod hold;
pub mod session;
pub mod storage;
pub mod todos;

pub use calendar::DayCell;
pub use error::{CoreError, StoreError, ValidationError};
pub use events::Event;
pub use goals::{DurationPreset, Goal, GoalBoard, GoalTerm};
pub use habits::{HabitLedger, HabitTask, MoveDirection};
pub use hold::{HoldState, HoldTracker};
pub use session::{CalendarView, CheckSession};
pub use storage::{Config, Snapshot, StateStore};
pub use todos::{DeletedTodo, Todo, TodoList};
