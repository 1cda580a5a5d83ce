use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hold-gesture lifecycle events.
///
/// The presentation layer polls the session for these to drive feedback
/// (shake, fill, celebration); tests assert on them directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A sustained hold began on an incomplete task.
    HoldStarted {
        task_id: String,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    /// Contact was released (or redirected) before the hold elapsed.
    /// No completion is recorded.
    HoldAborted {
        task_id: String,
        held_ms: u64,
        at: DateTime<Utc>,
    },
    /// The hold ran to completion and the task was marked done for today.
    HoldCompleted { task_id: String, at: DateTime<Utc> },
}
