//! Goal tracking commands for CLI.

use chrono::Utc;
use clap::Subcommand;
use habitdeck_core::goals::{DurationPreset, DEFAULT_COLOR};
use habitdeck_core::GoalTerm;

#[derive(Subcommand)]
pub enum GoalAction {
    /// Add a new goal
    Add {
        /// Goal title
        title: String,
        /// Duration preset: 1d, 1w, 1m, or 1y (default: 1w)
        #[arg(long, default_value = "1w")]
        duration: String,
        /// Accent color (hex)
        #[arg(long)]
        color: Option<String>,
    },
    /// List goals grouped by term
    List,
    /// Edit a goal
    Edit {
        /// Goal ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New duration preset: 1d, 1w, 1m, or 1y
        #[arg(long)]
        duration: Option<String>,
        /// New accent color (hex)
        #[arg(long)]
        color: Option<String>,
    },
    /// Set progress (0-10)
    Progress {
        /// Goal ID
        id: String,
        /// Progress value
        value: u8,
    },
    /// Reset progress to zero
    Reset {
        /// Goal ID
        id: String,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
}

pub fn run(action: GoalAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = crate::common::AppState::load()?;

    match action {
        GoalAction::Add {
            title,
            duration,
            color,
        } => {
            let preset = parse_duration(&duration)?;
            let color = color.unwrap_or_else(|| DEFAULT_COLOR.to_string());
            let goal = state.goals.add(&title, preset, color);
            println!("Goal created: {}", goal.id);
            println!("{}", serde_json::to_string_pretty(goal)?);
            state.save()?;
        }
        GoalAction::List => {
            let now = Utc::now();
            for (term, label) in [(GoalTerm::Short, "Short term"), (GoalTerm::Long, "Long term")] {
                println!("{label}:");
                for goal in state.goals.goals().iter().filter(|g| g.term == term) {
                    let (elapsed, remaining) = goal.elapsed_info(now);
                    println!(
                        "  {}  {:.1}%  {} / {} ({} days left)  {}",
                        goal.title,
                        goal.percent(),
                        elapsed,
                        goal.duration_days,
                        remaining,
                        goal.id
                    );
                }
            }
        }
        GoalAction::Edit {
            id,
            title,
            duration,
            color,
        } => {
            if state.goals.get(&id).is_none() {
                return Err(format!("Goal not found: {id}").into());
            }
            let preset = match duration {
                Some(ref text) => Some(parse_duration(text)?),
                None => None,
            };
            state
                .goals
                .update(&id, title.as_deref(), preset, color.as_deref());
            if let Some(goal) = state.goals.get(&id) {
                println!("{}", serde_json::to_string_pretty(goal)?);
            }
            state.save()?;
        }
        GoalAction::Progress { id, value } => {
            if state.goals.get(&id).is_none() {
                return Err(format!("Goal not found: {id}").into());
            }
            state.goals.set_progress(&id, value);
            state.save()?;
        }
        GoalAction::Reset { id } => {
            if state.goals.get(&id).is_none() {
                return Err(format!("Goal not found: {id}").into());
            }
            state.goals.reset_progress(&id);
            state.save()?;
        }
        GoalAction::Delete { id } => {
            state.goals.remove(&id);
            println!("Goal deleted: {id}");
            state.save()?;
        }
    }
    Ok(())
}

fn parse_duration(text: &str) -> Result<DurationPreset, Box<dyn std::error::Error>> {
    DurationPreset::parse(text)
        .ok_or_else(|| format!("unknown duration: {text} (expected 1d, 1w, 1m, or 1y)").into())
}
