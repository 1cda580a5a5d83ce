//! The habit ledger: tracked daily habits, per-day completion records and
//! notes, and the calendar views derived from them.
//!
//! The ledger is the single owner of habit state. All mutations run
//! synchronously on the caller's thread; persistence is a projection of the
//! current snapshot, handled elsewhere.

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::calendar::{self, DayCell};
use crate::error::ValidationError;

/// A tracked daily habit.
///
/// `records` maps day keys to "completed that day". Absent key means not
/// completed; only `true` entries are meaningful, though explicit `false`
/// entries are tolerated on load. `notes` holds non-empty free text per day;
/// clearing a note deletes the entry rather than storing an empty string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitTask {
    pub id: String,
    pub title: String,
    /// Creation instant; its local calendar day is the lower bound for
    /// calendar navigation.
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_record_map")]
    pub records: BTreeMap<String, bool>,
    #[serde(default, deserialize_with = "lenient_note_map")]
    pub notes: BTreeMap<String, String>,
}

/// Accept any JSON value for `records`; anything that is not an object of
/// booleans collapses to empty (normalization on load, never an error).
fn lenient_record_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Object(map) => map
            .into_iter()
            .filter_map(|(k, v)| v.as_bool().map(|b| (k, b)))
            .collect(),
        _ => BTreeMap::new(),
    })
}

/// Same policy for `notes`: keep string values, drop everything else.
fn lenient_note_map<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Object(map) => map
            .into_iter()
            .filter_map(|(k, v)| match v {
                serde_json::Value::String(s) => Some((k, s)),
                _ => None,
            })
            .collect(),
        _ => BTreeMap::new(),
    })
}

pub(crate) fn fresh_id(prefix: &str) -> String {
    format!("{}-{}-{}", prefix, Utc::now().timestamp(), Uuid::new_v4())
}

impl HabitTask {
    /// Create a habit with a fresh id and `created_at` of now.
    /// The title is assumed already trimmed and non-empty.
    pub fn new(title: impl Into<String>) -> Self {
        HabitTask {
            id: fresh_id("habit"),
            title: title.into(),
            created_at: Utc::now(),
            records: BTreeMap::new(),
            notes: BTreeMap::new(),
        }
    }

    /// The local calendar day this habit was created.
    pub fn created_day(&self) -> NaiveDate {
        self.created_at.with_timezone(&Local).date_naive()
    }

    /// Whether the habit was completed on the given day key.
    pub fn is_completed(&self, day_key: &str) -> bool {
        self.records.get(day_key).copied().unwrap_or(false)
    }

    /// Count of completed days ("checked N days" summaries).
    pub fn completion_count(&self) -> usize {
        self.records.values().filter(|done| **done).count()
    }

    /// Note for a day, or the empty string when absent.
    pub fn note(&self, day_key: &str) -> &str {
        self.notes.get(day_key).map(String::as_str).unwrap_or("")
    }
}

/// Direction for [`HabitLedger::reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Ordered collection of habit tasks. Order is user-controlled display order
/// and is persisted as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HabitLedger {
    tasks: Vec<HabitTask>,
}

impl HabitLedger {
    pub fn new(tasks: Vec<HabitTask>) -> Self {
        HabitLedger { tasks }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn tasks(&self) -> &[HabitTask] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HabitTask> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    pub fn is_completed(&self, id: &str, day_key: &str) -> bool {
        self.get(id).is_some_and(|t| t.is_completed(day_key))
    }

    pub fn completion_count(&self, id: &str) -> usize {
        self.get(id).map(HabitTask::completion_count).unwrap_or(0)
    }

    /// Note for `(id, day_key)`, empty string when either is absent.
    pub fn note(&self, id: &str, day_key: &str) -> &str {
        self.get(id).map(|t| t.note(day_key)).unwrap_or("")
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Create a habit from a user-entered title and insert it at the front.
    ///
    /// The title is trimmed; an empty result is rejected and the ledger is
    /// left unchanged.
    pub fn create(&mut self, title: &str) -> Result<&HabitTask, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        self.tasks.insert(0, HabitTask::new(title));
        Ok(&self.tasks[0])
    }

    /// Rename a habit. Same trim rule as [`create`](Self::create); an absent
    /// id is a silent no-op.
    pub fn rename(&mut self, id: &str, title: &str) -> Result<(), ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.title = title.to_string();
        }
        Ok(())
    }

    /// Remove a habit. Idempotent; returns whether anything was removed so
    /// collaborators can dismiss views keyed on this id.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Swap a habit with its neighbor in the given direction. No-op when the
    /// id is absent or the swap would run past either end.
    pub fn reorder(&mut self, id: &str, direction: MoveDirection) {
        let Some(index) = self.position(id) else {
            return;
        };
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => {
                let next = index + 1;
                (next < self.tasks.len()).then_some(next)
            }
        };
        if let Some(target) = target {
            self.tasks.swap(index, target);
        }
    }

    /// Mark a habit completed for today's local calendar day.
    ///
    /// Idempotent: already-completed days stay completed, and there is
    /// deliberately no uncomplete operation. Gating (the hold gesture) is the
    /// caller's responsibility.
    pub fn mark_completed_today(&mut self, id: &str) {
        self.mark_completed_on(id, calendar::today());
    }

    /// Day-explicit form of [`mark_completed_today`](Self::mark_completed_today).
    pub fn mark_completed_on(&mut self, id: &str, day: NaiveDate) {
        if let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) {
            task.records.insert(calendar::day_key(day), true);
        }
    }

    /// Set or clear today's note. Empty trimmed text deletes the entry.
    /// Notes are not gated on completion.
    pub fn set_note_for_today(&mut self, id: &str, text: &str) {
        self.set_note_on(id, calendar::today(), text);
    }

    /// Day-explicit form of [`set_note_for_today`](Self::set_note_for_today).
    pub fn set_note_on(&mut self, id: &str, day: NaiveDate, text: &str) {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return;
        };
        let key = calendar::day_key(day);
        let text = text.trim();
        if text.is_empty() {
            task.notes.remove(&key);
        } else {
            task.notes.insert(key, text.to_string());
        }
    }

    // ── Derived views ────────────────────────────────────────────────

    /// 7-column Sunday-first grid of `month` for a habit.
    ///
    /// Dates before the habit existed or after `today` come back as
    /// [`DayCell::OutOfRange`]; padding slots are [`DayCell::Pad`]. Pure:
    /// the same `(task, month, today)` always yields the same grid. An
    /// absent id yields an empty grid.
    pub fn calendar_window(&self, id: &str, month: NaiveDate, today: NaiveDate) -> Vec<DayCell> {
        let Some(task) = self.get(id) else {
            return Vec::new();
        };
        let created = task.created_day();
        calendar::month_cells(month)
            .into_iter()
            .map(|slot| match slot {
                None => DayCell::Pad,
                Some(date) if date < created || date > today => DayCell::OutOfRange { date },
                Some(date) => {
                    let key = calendar::day_key(date);
                    let completed = task.is_completed(&key);
                    DayCell::Day {
                        date,
                        key,
                        completed,
                    }
                }
            })
            .collect()
    }

    /// Inclusive month navigation range for a habit: first-of-month of its
    /// creation day through first-of-month of `today`.
    pub fn month_bounds(&self, id: &str, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let task = self.get(id)?;
        Some((
            calendar::month_start(task.created_day()),
            calendar::month_start(today),
        ))
    }
}
