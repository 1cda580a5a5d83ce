//! Hold-to-complete gesture tracker.
//!
//! Completion is gated behind a sustained hold so a single accidental tap
//! cannot mark a habit done. The tracker is a wall-clock state machine in the
//! same shape as a caller-ticked timer: no internal threads, the caller polls
//! `tick()` and reacts to the returned events.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Holding -> Completed
//!            |
//!            +-> Idle (released early, no partial credit)
//! ```
//!
//! At most one task holds at a time; beginning a hold on another task aborts
//! the one in progress. A task already completed today never enters Holding.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Default sustained-hold duration in milliseconds.
pub const DEFAULT_HOLD_MS: u64 = 3_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum HoldState {
    Idle,
    Holding {
        task_id: String,
        /// When the hold began (epoch milliseconds).
        since_epoch_ms: u64,
    },
    /// The hold elapsed; the completion has not yet been consumed by the
    /// caller via [`HoldTracker::take_completed`].
    Completed { task_id: String },
}

/// Caller-ticked hold tracker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldTracker {
    state: HoldState,
    duration_ms: u64,
}

impl Default for HoldTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD_MS)
    }
}

impl HoldTracker {
    pub fn new(duration_ms: u64) -> Self {
        HoldTracker {
            state: HoldState::Idle,
            duration_ms,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &HoldState {
        &self.state
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn is_holding(&self, task_id: &str) -> bool {
        matches!(&self.state, HoldState::Holding { task_id: held, .. } if held == task_id)
    }

    /// 0.0 .. 1.0 progress of the current hold. Idle reads 0, a consumable
    /// completion reads 1.
    pub fn progress(&self) -> f64 {
        self.progress_at(now_ms())
    }

    fn progress_at(&self, now: u64) -> f64 {
        match &self.state {
            HoldState::Idle => 0.0,
            HoldState::Completed { .. } => 1.0,
            HoldState::Holding { since_epoch_ms, .. } => {
                if self.duration_ms == 0 {
                    return 1.0;
                }
                let held = now.saturating_sub(*since_epoch_ms);
                (held as f64 / self.duration_ms as f64).min(1.0)
            }
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a hold on a task.
    ///
    /// Returns the events this caused: an abort for any in-progress hold on
    /// another task, then the start. A task already completed today is
    /// refused (empty event list, state unchanged unless a prior hold was
    /// cancelled by the caller's own flow).
    pub fn begin(&mut self, task_id: &str, completed_today: bool) -> Vec<Event> {
        self.begin_at(task_id, completed_today, now_ms())
    }

    fn begin_at(&mut self, task_id: &str, completed_today: bool, now: u64) -> Vec<Event> {
        if completed_today {
            return Vec::new();
        }
        let mut events = Vec::new();
        if let Some(abort) = self.release_at(now) {
            events.push(abort);
        }
        self.state = HoldState::Holding {
            task_id: task_id.to_string(),
            since_epoch_ms: now,
        };
        events.push(Event::HoldStarted {
            task_id: task_id.to_string(),
            duration_ms: self.duration_ms,
            at: Utc::now(),
        });
        events
    }

    /// Release contact. Aborts an in-progress hold with no partial credit;
    /// releasing when idle or after completion is an idempotent no-op.
    pub fn release(&mut self) -> Option<Event> {
        self.release_at(now_ms())
    }

    fn release_at(&mut self, now: u64) -> Option<Event> {
        // Only Holding is cancelled; a Completed hold stays consumable.
        let HoldState::Holding {
            task_id,
            since_epoch_ms,
        } = &self.state
        else {
            return None;
        };
        let event = Event::HoldAborted {
            task_id: task_id.clone(),
            held_ms: now.saturating_sub(*since_epoch_ms),
            at: Utc::now(),
        };
        self.state = HoldState::Idle;
        Some(event)
    }

    /// Call periodically. Returns `Some(Event::HoldCompleted)` exactly once
    /// when the hold elapses.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(now_ms())
    }

    fn tick_at(&mut self, now: u64) -> Option<Event> {
        let HoldState::Holding {
            task_id,
            since_epoch_ms,
        } = &self.state
        else {
            return None;
        };
        if now.saturating_sub(*since_epoch_ms) < self.duration_ms {
            return None;
        }
        let task_id = task_id.clone();
        self.state = HoldState::Completed {
            task_id: task_id.clone(),
        };
        Some(Event::HoldCompleted {
            task_id,
            at: Utc::now(),
        })
    }

    /// Consume a finished hold, returning the task id to mark completed.
    pub fn take_completed(&mut self) -> Option<String> {
        if let HoldState::Completed { task_id } = &self.state {
            let task_id = task_id.clone();
            self.state = HoldState::Idle;
            return Some(task_id);
        }
        None
    }

    /// Drop any state, aborting silently. Used on session teardown.
    pub fn reset(&mut self) {
        self.state = HoldState::Idle;
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_then_elapse_completes() {
        let mut tracker = HoldTracker::new(3_000);
        let events = tracker.begin_at("a", false, 1_000);
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], Event::HoldStarted { .. }));

        assert!(tracker.tick_at(2_000).is_none());
        assert!(tracker.is_holding("a"));

        let done = tracker.tick_at(4_000).unwrap();
        assert!(matches!(done, Event::HoldCompleted { ref task_id, .. } if task_id == "a"));
        assert_eq!(tracker.take_completed().as_deref(), Some("a"));
        assert_eq!(tracker.state(), &HoldState::Idle);
    }

    #[test]
    fn early_release_aborts_without_credit() {
        let mut tracker = HoldTracker::new(3_000);
        tracker.begin_at("a", false, 1_000);
        let aborted = tracker.release_at(2_500).unwrap();
        assert!(matches!(aborted, Event::HoldAborted { held_ms: 1_500, .. }));
        assert_eq!(tracker.state(), &HoldState::Idle);
        assert!(tracker.take_completed().is_none());
    }

    #[test]
    fn release_is_idempotent() {
        let mut tracker = HoldTracker::new(3_000);
        assert!(tracker.release_at(100).is_none());
        tracker.begin_at("a", false, 1_000);
        assert!(tracker.release_at(1_500).is_some());
        assert!(tracker.release_at(1_600).is_none());
    }

    #[test]
    fn switching_tasks_aborts_the_first_hold() {
        let mut tracker = HoldTracker::new(3_000);
        tracker.begin_at("a", false, 1_000);
        let events = tracker.begin_at("b", false, 2_000);
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::HoldAborted { ref task_id, .. } if task_id == "a"));
        assert!(matches!(events[1], Event::HoldStarted { ref task_id, .. } if task_id == "b"));

        // B proceeds on its own clock.
        assert!(tracker.tick_at(4_000).is_none());
        assert!(tracker.tick_at(5_000).is_some());
        assert_eq!(tracker.take_completed().as_deref(), Some("b"));
    }

    #[test]
    fn completed_task_cannot_reenter_holding() {
        let mut tracker = HoldTracker::new(3_000);
        let events = tracker.begin_at("a", true, 1_000);
        assert!(events.is_empty());
        assert_eq!(tracker.state(), &HoldState::Idle);
    }

    #[test]
    fn tick_fires_exactly_once() {
        let mut tracker = HoldTracker::new(1_000);
        tracker.begin_at("a", false, 0);
        assert!(tracker.tick_at(1_000).is_some());
        assert!(tracker.tick_at(2_000).is_none());
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut tracker = HoldTracker::new(2_000);
        assert_eq!(tracker.progress_at(0), 0.0);
        tracker.begin_at("a", false, 1_000);
        assert!((tracker.progress_at(2_000) - 0.5).abs() < f64::EPSILON);
        tracker.tick_at(3_000);
        assert_eq!(tracker.progress_at(9_000), 1.0);
    }
}
