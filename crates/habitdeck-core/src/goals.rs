//! Goal tracker: dated goals with a duration preset, a 0-10 progress dial,
//! and an accent color.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::habits::fresh_id;

/// Short-term goals render in one section, long-term in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalTerm {
    Short,
    Long,
}

/// The four duration presets a goal can be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationPreset {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1m")]
    OneMonth,
    #[serde(rename = "1y")]
    OneYear,
}

impl DurationPreset {
    pub fn days(self) -> u32 {
        match self {
            DurationPreset::OneDay => 1,
            DurationPreset::OneWeek => 7,
            DurationPreset::OneMonth => 30,
            DurationPreset::OneYear => 365,
        }
    }

    pub fn term(self) -> GoalTerm {
        match self {
            DurationPreset::OneDay | DurationPreset::OneWeek => GoalTerm::Short,
            DurationPreset::OneMonth | DurationPreset::OneYear => GoalTerm::Long,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DurationPreset::OneDay => "1 day",
            DurationPreset::OneWeek => "1 week",
            DurationPreset::OneMonth => "1 month",
            DurationPreset::OneYear => "1 year",
        }
    }

    /// Recover the preset from a stored day count. Unknown counts fall back
    /// to the one-week preset.
    pub fn from_days(days: u32) -> Self {
        match days {
            1 => DurationPreset::OneDay,
            7 => DurationPreset::OneWeek,
            30 => DurationPreset::OneMonth,
            365 => DurationPreset::OneYear,
            _ => DurationPreset::OneWeek,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "1d" => Some(DurationPreset::OneDay),
            "1w" => Some(DurationPreset::OneWeek),
            "1m" => Some(DurationPreset::OneMonth),
            "1y" => Some(DurationPreset::OneYear),
            _ => None,
        }
    }
}

/// Accent color presets offered by the goal form.
pub const COLOR_OPTIONS: [(&str, &str); 5] = [
    ("Emerald", "#2fb97f"),
    ("Indigo", "#6d5bd0"),
    ("Amber", "#f6ad55"),
    ("Rose", "#f472b6"),
    ("Stone", "#d1d5db"),
];

pub const DEFAULT_COLOR: &str = COLOR_OPTIONS[0].1;

pub const MAX_PROGRESS: u8 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub duration_days: u32,
    pub term: GoalTerm,
    /// 0..=10 dial.
    #[serde(default)]
    pub progress: u8,
    pub color: String,
}

impl Goal {
    /// Build a goal from a form submission. An empty trimmed title is saved
    /// as "Untitled goal" rather than rejected (goals, unlike habits and
    /// todos, always save).
    pub fn new(title: &str, preset: DurationPreset, color: impl Into<String>) -> Self {
        let title = title.trim();
        Goal {
            id: fresh_id("goal"),
            title: if title.is_empty() {
                "Untitled goal".to_string()
            } else {
                title.to_string()
            },
            created_at: Utc::now(),
            duration_days: preset.days(),
            term: preset.term(),
            progress: 0,
            color: color.into(),
        }
    }

    pub fn preset(&self) -> DurationPreset {
        DurationPreset::from_days(self.duration_days)
    }

    /// Progress as a percentage, one decimal: `round(progress / 10 * 1000) / 10`.
    /// The formula is preserved exactly from the form it has always had.
    pub fn percent(&self) -> f64 {
        (f64::from(self.progress) / 10.0 * 1000.0).round() / 10.0
    }

    /// Whole days elapsed since creation and whole days remaining of the
    /// goal's duration, both clamped at zero.
    pub fn elapsed_info(&self, now: DateTime<Utc>) -> (u32, u32) {
        let elapsed_ms = now.signed_duration_since(self.created_at).num_milliseconds();
        let elapsed_days = (elapsed_ms / 86_400_000).max(0) as u32;
        let remaining_days = self.duration_days.saturating_sub(elapsed_days);
        (elapsed_days, remaining_days)
    }
}

/// Ordered collection of goals, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalBoard {
    goals: Vec<Goal>,
}

impl GoalBoard {
    pub fn new(goals: Vec<Goal>) -> Self {
        GoalBoard { goals }
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn get(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn short_term(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter().filter(|g| g.term == GoalTerm::Short)
    }

    pub fn long_term(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter().filter(|g| g.term == GoalTerm::Long)
    }

    /// Add a new goal at the front.
    pub fn add(&mut self, title: &str, preset: DurationPreset, color: impl Into<String>) -> &Goal {
        self.goals.insert(0, Goal::new(title, preset, color));
        &self.goals[0]
    }

    /// Edit an existing goal in place, keeping its id and `created_at`.
    /// Unknown ids are a no-op.
    pub fn update(
        &mut self,
        id: &str,
        title: Option<&str>,
        preset: Option<DurationPreset>,
        color: Option<&str>,
    ) {
        let Some(goal) = self.goals.iter_mut().find(|g| g.id == id) else {
            return;
        };
        if let Some(title) = title {
            let title = title.trim();
            goal.title = if title.is_empty() {
                "Untitled goal".to_string()
            } else {
                title.to_string()
            };
        }
        if let Some(preset) = preset {
            goal.duration_days = preset.days();
            goal.term = preset.term();
        }
        if let Some(color) = color {
            goal.color = color.to_string();
        }
    }

    /// Set the progress dial, clamped to 0..=10.
    pub fn set_progress(&mut self, id: &str, progress: u8) {
        if let Some(goal) = self.goals.iter_mut().find(|g| g.id == id) {
            goal.progress = progress.min(MAX_PROGRESS);
        }
    }

    pub fn reset_progress(&mut self, id: &str) {
        self.set_progress(id, 0);
    }

    /// Remove a goal. Idempotent.
    pub fn remove(&mut self, id: &str) {
        self.goals.retain(|g| g.id != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn preset_mapping() {
        assert_eq!(DurationPreset::OneWeek.days(), 7);
        assert_eq!(DurationPreset::OneWeek.term(), GoalTerm::Short);
        assert_eq!(DurationPreset::OneMonth.term(), GoalTerm::Long);
        assert_eq!(DurationPreset::from_days(365), DurationPreset::OneYear);
        // Unknown day counts fall back to a week.
        assert_eq!(DurationPreset::from_days(42), DurationPreset::OneWeek);
        assert_eq!(DurationPreset::parse("1m"), Some(DurationPreset::OneMonth));
        assert_eq!(DurationPreset::parse("2w"), None);
    }

    #[test]
    fn empty_title_becomes_untitled() {
        let goal = Goal::new("   ", DurationPreset::OneWeek, DEFAULT_COLOR);
        assert_eq!(goal.title, "Untitled goal");
    }

    #[test]
    fn percent_rounding_rule() {
        let mut goal = Goal::new("run", DurationPreset::OneWeek, DEFAULT_COLOR);
        let expected = [
            0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0, 70.0, 80.0, 90.0, 100.0,
        ];
        for (progress, want) in expected.iter().enumerate() {
            goal.progress = progress as u8;
            assert_eq!(goal.percent(), *want);
        }
    }

    #[test]
    fn elapsed_info_floors_and_clamps() {
        let goal = Goal::new("run", DurationPreset::OneWeek, DEFAULT_COLOR);

        let now = goal.created_at + Duration::hours(36);
        assert_eq!(goal.elapsed_info(now), (1, 6));

        // Clock skew before creation clamps to zero elapsed.
        let before = goal.created_at - Duration::hours(5);
        assert_eq!(goal.elapsed_info(before), (0, 7));

        // Past the duration, remaining clamps to zero.
        let late = goal.created_at + Duration::days(30);
        assert_eq!(goal.elapsed_info(late), (30, 0));
    }

    #[test]
    fn board_add_update_remove() {
        let mut board = GoalBoard::default();
        let id = board
            .add("learn piano", DurationPreset::OneYear, DEFAULT_COLOR)
            .id
            .clone();
        board.add("run", DurationPreset::OneWeek, DEFAULT_COLOR);

        assert_eq!(board.goals()[0].title, "run");
        assert_eq!(board.short_term().count(), 1);
        assert_eq!(board.long_term().count(), 1);

        let created = board.get(&id).unwrap().created_at;
        board.update(&id, Some("learn jazz piano"), Some(DurationPreset::OneMonth), None);
        let goal = board.get(&id).unwrap();
        assert_eq!(goal.title, "learn jazz piano");
        assert_eq!(goal.duration_days, 30);
        assert_eq!(goal.term, GoalTerm::Long);
        assert_eq!(goal.created_at, created);

        board.remove(&id);
        assert!(board.get(&id).is_none());
        board.remove(&id); // idempotent
    }

    #[test]
    fn progress_clamps_and_resets() {
        let mut board = GoalBoard::default();
        let id = board
            .add("run", DurationPreset::OneWeek, DEFAULT_COLOR)
            .id
            .clone();
        board.set_progress(&id, 14);
        assert_eq!(board.get(&id).unwrap().progress, 10);
        board.reset_progress(&id);
        assert_eq!(board.get(&id).unwrap().progress, 0);
    }

    #[test]
    fn goal_wire_format() {
        let goal = Goal::new("run", DurationPreset::OneWeek, DEFAULT_COLOR);
        let json = serde_json::to_value(&goal).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("durationDays").is_some());
        assert_eq!(json.get("term").unwrap(), "short");
    }
}
