//! Single-snapshot JSON persistence.
//!
//! The whole app state is one JSON document: `todos`, `history`, `goals`,
//! and `dailyTasks` side by side. Every mutation rewrites the full snapshot;
//! there is no partial write and no write-ahead log. Loading never fails past
//! this boundary: a missing file yields the seed snapshot, and malformed
//! content is normalized or dropped element by element rather than rejected
//! wholesale, so one bad record cannot take the rest of the data with it.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::data_dir;
use crate::calendar;
use crate::error::StoreError;
use crate::goals::{DurationPreset, Goal, GoalBoard, DEFAULT_COLOR};
use crate::habits::{fresh_id, HabitLedger, HabitTask};
use crate::todos::{DeletedTodo, Todo, TodoList};

pub const SNAPSHOT_FILE: &str = "snapshot.json";

/// The persisted document. Field names are part of the wire format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub todos: Vec<Todo>,
    pub history: Vec<DeletedTodo>,
    pub goals: Vec<Goal>,
    pub daily_tasks: Vec<HabitTask>,
}

impl Snapshot {
    /// Starter content for a first run.
    pub fn seed() -> Self {
        let mut todos = TodoList::default();
        // Inserted in reverse so the welcome item reads first.
        let _ = todos.add("Swipe through the tabs to explore");
        let _ = todos.add("Welcome! Add your first task");

        let mut goals = GoalBoard::default();
        goals.add("Set a goal for this week", DurationPreset::OneWeek, DEFAULT_COLOR);

        let mut ledger = HabitLedger::default();
        let _ = ledger.create("exercise");

        Snapshot::from_state(&ledger, &todos, &goals)
    }

    /// Capture the live state for persistence.
    pub fn from_state(ledger: &HabitLedger, todos: &TodoList, goals: &GoalBoard) -> Self {
        Snapshot {
            todos: todos.todos().to_vec(),
            history: todos.history().to_vec(),
            goals: goals.goals().to_vec(),
            daily_tasks: ledger.tasks().to_vec(),
        }
    }

    /// Rebuild the live state from a loaded snapshot.
    pub fn into_state(self) -> (HabitLedger, TodoList, GoalBoard) {
        (
            HabitLedger::new(self.daily_tasks),
            TodoList::new(self.todos, self.history),
            GoalBoard::new(self.goals),
        )
    }

    /// Decode a snapshot from raw JSON, normalizing as needed.
    ///
    /// Unknown top-level keys are ignored; a section that is not an array
    /// reads as empty; array elements that cannot be decoded are dropped
    /// individually. Daily tasks additionally get missing fields repaired
    /// (see [`normalize_daily_task`]).
    pub fn from_json_value(value: Value) -> Self {
        let Value::Object(mut map) = value else {
            return Snapshot::default();
        };
        Snapshot {
            todos: decode_array(map.remove("todos")),
            history: decode_array(map.remove("history")),
            goals: decode_array(map.remove("goals")),
            daily_tasks: match map.remove("dailyTasks") {
                Some(Value::Array(items)) => {
                    items.into_iter().filter_map(normalize_daily_task).collect()
                }
                _ => Vec::new(),
            },
        }
    }
}

fn decode_array<T: serde::de::DeserializeOwned>(value: Option<Value>) -> Vec<T> {
    match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    }
}

/// Repair a stored daily task: a missing or empty id gets a fresh one, a
/// blank title becomes "daily task", and a missing or unparseable creation
/// instant is derived from the earliest checked day (local midnight), falling
/// back to now. Non-object values are dropped entirely.
fn normalize_daily_task(value: Value) -> Option<HabitTask> {
    let Value::Object(mut map) = value else {
        return None;
    };

    let id_ok = map
        .get("id")
        .and_then(Value::as_str)
        .is_some_and(|s| !s.is_empty());
    if !id_ok {
        map.insert("id".into(), Value::String(fresh_id("daily")));
    }

    let title = map
        .get("title")
        .and_then(Value::as_str)
        .map(str::trim)
        .unwrap_or("");
    if title.is_empty() {
        map.insert("title".into(), Value::String("daily task".into()));
    } else {
        map.insert("title".into(), Value::String(title.into()));
    }

    let created_ok = map
        .get("createdAt")
        .is_some_and(|v| serde_json::from_value::<DateTime<Utc>>(v.clone()).is_ok());
    if !created_ok {
        let derived = derived_created_at(map.get("records"));
        map.insert("createdAt".into(), Value::String(derived.to_rfc3339()));
    }

    serde_json::from_value(Value::Object(map)).ok()
}

/// Earliest checked day key interpreted as local midnight, else now.
fn derived_created_at(records: Option<&Value>) -> DateTime<Utc> {
    let earliest = records
        .and_then(Value::as_object)
        .into_iter()
        .flatten()
        .filter(|(_, checked)| checked.as_bool() == Some(true))
        .filter_map(|(key, _)| calendar::parse_day_key(key))
        .min();
    match earliest {
        Some(day) => {
            let midnight = day.and_hms_opt(0, 0, 0).unwrap_or_default();
            match Local.from_local_datetime(&midnight).earliest() {
                Some(local) => local.with_timezone(&Utc),
                None => Utc::now(),
            }
        }
        None => Utc::now(),
    }
}

/// Reads and writes the snapshot file.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    /// Store at the default location under [`data_dir`].
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn open() -> Result<Self, StoreError> {
        Ok(Self::at(data_dir()?.join(SNAPSHOT_FILE)))
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        StateStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the snapshot. Never fails: a missing file yields the seed
    /// snapshot, unreadable or unparseable content is logged and replaced
    /// with the seed as well.
    pub fn load(&self) -> Snapshot {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no snapshot at {}, starting fresh", self.path.display());
                return Snapshot::seed();
            }
            Err(err) => {
                log::warn!("failed to read {}: {err}", self.path.display());
                return Snapshot::seed();
            }
        };
        match serde_json::from_str::<Value>(&content) {
            Ok(value) => Snapshot::from_json_value(value),
            Err(err) => {
                log::warn!("malformed snapshot at {}: {err}", self.path.display());
                Snapshot::seed()
            }
        }
    }

    /// Persist the snapshot, replacing the previous file.
    ///
    /// # Errors
    /// Returns an error if encoding or writing fails.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, content).map_err(|source| StoreError::WriteFailed {
            path: self.path.clone(),
            source,
        })
    }

    /// Save, logging instead of propagating on failure. Mirrors the save
    /// path of interactive flows where a failed write should not interrupt
    /// the user.
    pub fn save_best_effort(&self, snapshot: &Snapshot) {
        if let Err(err) = self.save(snapshot) {
            log::warn!("failed to persist snapshot: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_document_reads_as_empty() {
        let snap = Snapshot::from_json_value(json!([1, 2, 3]));
        assert!(snap.todos.is_empty());
        assert!(snap.daily_tasks.is_empty());
    }

    #[test]
    fn non_array_sections_read_as_empty() {
        let snap = Snapshot::from_json_value(json!({
            "todos": "oops",
            "goals": {"not": "an array"},
            "dailyTasks": null
        }));
        assert!(snap.todos.is_empty());
        assert!(snap.goals.is_empty());
        assert!(snap.daily_tasks.is_empty());
    }

    #[test]
    fn bad_elements_are_dropped_individually() {
        let snap = Snapshot::from_json_value(json!({
            "todos": [
                {"id": "t1", "title": "keep me"},
                {"title": 42},
                "not even an object"
            ]
        }));
        assert_eq!(snap.todos.len(), 1);
        assert_eq!(snap.todos[0].title, "keep me");
    }

    #[test]
    fn daily_task_missing_fields_are_repaired() {
        let snap = Snapshot::from_json_value(json!({
            "dailyTasks": [{
                "records": {"2024-06-03": true, "2024-06-01": true, "2024-06-02": false}
            }]
        }));
        assert_eq!(snap.daily_tasks.len(), 1);
        let task = &snap.daily_tasks[0];
        assert!(task.id.starts_with("daily-"));
        assert_eq!(task.title, "daily task");
        // Derived from the earliest checked day, not the false one.
        assert_eq!(task.created_day(), calendar::parse_day_key("2024-06-01").unwrap());
        assert_eq!(task.completion_count(), 2);
    }

    #[test]
    fn daily_task_blank_title_is_repaired() {
        let snap = Snapshot::from_json_value(json!({
            "dailyTasks": [{"id": "daily-7", "title": "   ", "createdAt": "2024-06-01T09:00:00Z"}]
        }));
        assert_eq!(snap.daily_tasks[0].title, "daily task");
        assert_eq!(snap.daily_tasks[0].id, "daily-7");
    }

    #[test]
    fn daily_task_without_records_created_now() {
        let before = Utc::now();
        let snap = Snapshot::from_json_value(json!({"dailyTasks": [{}]}));
        let task = &snap.daily_tasks[0];
        assert!(task.created_at >= before);
        assert!(task.records.is_empty());
    }

    #[test]
    fn state_roundtrip_preserves_order() {
        let mut ledger = HabitLedger::default();
        ledger.create("exercise").unwrap();
        ledger.create("read").unwrap();
        let mut todos = TodoList::default();
        todos.add("buy milk").unwrap();
        let goals = GoalBoard::default();

        let snap = Snapshot::from_state(&ledger, &todos, &goals);
        let json = serde_json::to_value(&snap).unwrap();
        assert!(json.get("dailyTasks").is_some());

        let (ledger2, todos2, _) = Snapshot::from_json_value(json).into_state();
        let titles: Vec<&str> = ledger2.tasks().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["read", "exercise"]);
        assert_eq!(todos2.todos()[0].title, "buy milk");
    }

    #[test]
    fn seed_has_content_in_every_section_but_history() {
        let seed = Snapshot::seed();
        assert!(!seed.todos.is_empty());
        assert!(!seed.goals.is_empty());
        assert!(!seed.daily_tasks.is_empty());
        assert!(seed.history.is_empty());
    }
}
