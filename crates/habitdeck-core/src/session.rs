//! Daily-check session state.
//!
//! The session owns the view-side references into the ledger: the linear walk
//! index, whichever task has its calendar, title editor, or note editor open,
//! and the hold tracker. References are plain ids validated against the
//! ledger on every read, so a dangling reference after a deletion resolves to
//! "nothing open" instead of a stale view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::events::Event;
use crate::habits::{HabitLedger, HabitTask};
use crate::hold::HoldTracker;

/// An open calendar view for one task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarView {
    pub task_id: String,
    /// First-of-month currently shown, clamped to the task's month bounds.
    pub month: NaiveDate,
    /// Selected day key, if any.
    pub selected: Option<String>,
}

/// View state for a daily-check run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckSession {
    index: usize,
    calendar: Option<CalendarView>,
    editing: Option<String>,
    noting: Option<String>,
    hold: HoldTracker,
}

impl Default for CheckSession {
    fn default() -> Self {
        Self::new(HoldTracker::default())
    }
}

impl CheckSession {
    pub fn new(hold: HoldTracker) -> Self {
        CheckSession {
            index: 0,
            calendar: None,
            editing: None,
            noting: None,
            hold,
        }
    }

    // ── Linear walk ──────────────────────────────────────────────────

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current<'a>(&self, ledger: &'a HabitLedger) -> Option<&'a HabitTask> {
        ledger.tasks().get(self.index)
    }

    /// Move the walk to `index` (clamped). Switching pages aborts any hold
    /// in progress; the abort event, if any, is returned.
    pub fn select(&mut self, ledger: &HabitLedger, index: usize) -> Option<Event> {
        self.index = index.min(ledger.len().saturating_sub(1));
        self.hold.release()
    }

    /// Re-clamp the index after the ledger shrinks.
    pub fn clamp(&mut self, ledger: &HabitLedger) {
        if ledger.is_empty() {
            self.index = 0;
            self.hold.reset();
        } else if self.index >= ledger.len() {
            self.index = ledger.len() - 1;
        }
    }

    // ── Hold gesture ─────────────────────────────────────────────────

    pub fn hold(&self) -> &HoldTracker {
        &self.hold
    }

    /// Begin a hold on a task for today. Refused for unknown ids and for
    /// tasks already completed today.
    pub fn start_hold(&mut self, ledger: &HabitLedger, id: &str) -> Vec<Event> {
        let Some(task) = ledger.get(id) else {
            return Vec::new();
        };
        let done_today = task.is_completed(&calendar::today_key());
        self.hold.begin(id, done_today)
    }

    /// Release contact before the hold elapses.
    pub fn release_hold(&mut self) -> Option<Event> {
        self.hold.release()
    }

    /// Poll the hold timer. When a hold completes, the completion is written
    /// straight into the ledger for today.
    pub fn tick(&mut self, ledger: &mut HabitLedger) -> Option<Event> {
        let event = self.hold.tick();
        if let Some(id) = self.hold.take_completed() {
            ledger.mark_completed_today(&id);
        }
        event
    }

    // ── Calendar view ────────────────────────────────────────────────

    /// Open the calendar for a task at the current month with today
    /// selected. Returns false for unknown ids.
    pub fn open_calendar(&mut self, ledger: &HabitLedger, id: &str, today: NaiveDate) -> bool {
        if ledger.get(id).is_none() {
            return false;
        }
        self.calendar = Some(CalendarView {
            task_id: id.to_string(),
            month: calendar::month_start(today),
            selected: Some(calendar::day_key(today)),
        });
        true
    }

    /// The open calendar view, or `None` when closed or its task is gone.
    pub fn calendar(&self, ledger: &HabitLedger) -> Option<&CalendarView> {
        self.calendar
            .as_ref()
            .filter(|view| ledger.get(&view.task_id).is_some())
    }

    pub fn close_calendar(&mut self) {
        self.calendar = None;
    }

    /// Shift the calendar month by `delta` months, clamped to the task's
    /// navigation bounds. Past either bound this is a no-op.
    pub fn shift_calendar_month(&mut self, ledger: &HabitLedger, delta: i32, today: NaiveDate) {
        let Some(view) = self.calendar.as_mut() else {
            return;
        };
        let Some((min, max)) = ledger.month_bounds(&view.task_id, today) else {
            return;
        };
        view.month = calendar::clamp_month(calendar::add_months(view.month, delta), min, max);
    }

    pub fn select_calendar_day(&mut self, day_key: impl Into<String>) {
        if let Some(view) = self.calendar.as_mut() {
            view.selected = Some(day_key.into());
        }
    }

    // ── Title / note editors ─────────────────────────────────────────

    pub fn open_editor(&mut self, ledger: &HabitLedger, id: &str) -> bool {
        if ledger.get(id).is_none() {
            return false;
        }
        self.editing = Some(id.to_string());
        true
    }

    pub fn editing<'a>(&self, ledger: &'a HabitLedger) -> Option<&'a HabitTask> {
        self.editing.as_deref().and_then(|id| ledger.get(id))
    }

    pub fn close_editor(&mut self) {
        self.editing = None;
    }

    pub fn open_note_editor(&mut self, ledger: &HabitLedger, id: &str) -> bool {
        if ledger.get(id).is_none() {
            return false;
        }
        self.noting = Some(id.to_string());
        true
    }

    pub fn note_target<'a>(&self, ledger: &'a HabitLedger) -> Option<&'a HabitTask> {
        self.noting.as_deref().and_then(|id| ledger.get(id))
    }

    pub fn close_note_editor(&mut self) {
        self.noting = None;
    }

    // ── Deletion contract ────────────────────────────────────────────

    /// Delete a task and dismiss everything keyed on it: calendar view,
    /// title editor, note editor, and any hold in progress. Idempotent.
    pub fn delete_task(&mut self, ledger: &mut HabitLedger, id: &str) -> bool {
        if self.calendar.as_ref().is_some_and(|v| v.task_id == id) {
            self.calendar = None;
        }
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        if self.noting.as_deref() == Some(id) {
            self.noting = None;
        }
        if self.hold.is_holding(id) {
            self.hold.release();
        }
        let removed = ledger.remove(id);
        self.clamp(ledger);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_of(titles: &[&str]) -> (HabitLedger, Vec<String>) {
        let mut ledger = HabitLedger::default();
        for title in titles.iter().rev() {
            ledger.create(title).unwrap();
        }
        let ids = ledger.tasks().iter().map(|t| t.id.clone()).collect();
        (ledger, ids)
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn select_clamps_and_aborts_hold() {
        let (ledger, ids) = ledger_of(&["a", "b"]);
        let mut session = CheckSession::default();

        session.start_hold(&ledger, &ids[0]);
        let aborted = session.select(&ledger, 99);
        assert_eq!(session.index(), 1);
        assert!(matches!(aborted, Some(Event::HoldAborted { .. })));
    }

    #[test]
    fn clamp_after_shrink() {
        let (mut ledger, ids) = ledger_of(&["a", "b", "c"]);
        let mut session = CheckSession::default();
        session.select(&ledger, 2);

        ledger.remove(&ids[2]);
        session.clamp(&ledger);
        assert_eq!(session.index(), 1);

        ledger.remove(&ids[0]);
        ledger.remove(&ids[1]);
        session.clamp(&ledger);
        assert_eq!(session.index(), 0);
        assert!(session.current(&ledger).is_none());
    }

    #[test]
    fn start_hold_refuses_completed_today() {
        let (mut ledger, ids) = ledger_of(&["a"]);
        ledger.mark_completed_today(&ids[0]);
        let mut session = CheckSession::default();
        assert!(session.start_hold(&ledger, &ids[0]).is_empty());
    }

    #[test]
    fn deleting_closes_views_keyed_on_id() {
        let (mut ledger, ids) = ledger_of(&["a", "b"]);
        let mut session = CheckSession::default();
        let today = d(2024, 6, 10);

        assert!(session.open_calendar(&ledger, &ids[0], today));
        assert!(session.open_editor(&ledger, &ids[0]));
        assert!(session.open_note_editor(&ledger, &ids[0]));
        session.start_hold(&ledger, &ids[0]);

        assert!(session.delete_task(&mut ledger, &ids[0]));
        assert!(session.calendar(&ledger).is_none());
        assert!(session.editing(&ledger).is_none());
        assert!(session.note_target(&ledger).is_none());
        assert!(!session.hold().is_holding(&ids[0]));

        // Idempotent.
        assert!(!session.delete_task(&mut ledger, &ids[0]));
    }

    #[test]
    fn deleting_other_task_keeps_views() {
        let (mut ledger, ids) = ledger_of(&["a", "b"]);
        let mut session = CheckSession::default();
        session.open_note_editor(&ledger, &ids[0]);

        session.delete_task(&mut ledger, &ids[1]);
        assert!(session.note_target(&ledger).is_some());
    }

    #[test]
    fn dangling_reference_reads_as_closed() {
        let (mut ledger, ids) = ledger_of(&["a"]);
        let mut session = CheckSession::default();
        session.open_calendar(&ledger, &ids[0], d(2024, 6, 10));

        // Removed behind the session's back (e.g. another code path).
        ledger.remove(&ids[0]);
        assert!(session.calendar(&ledger).is_none());
    }

    #[test]
    fn calendar_navigation_clamps_to_bounds() {
        let (ledger, ids) = ledger_of(&["a"]);
        let mut session = CheckSession::default();
        let today = calendar::today();
        session.open_calendar(&ledger, &ids[0], today);

        // Task was created today, so both bounds are the current month.
        session.shift_calendar_month(&ledger, -1, today);
        assert_eq!(
            session.calendar(&ledger).unwrap().month,
            calendar::month_start(today)
        );
        session.shift_calendar_month(&ledger, 1, today);
        assert_eq!(
            session.calendar(&ledger).unwrap().month,
            calendar::month_start(today)
        );
    }
}
