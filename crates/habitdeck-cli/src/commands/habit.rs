//! Daily habit commands for CLI.

use std::io::Write as _;
use std::time::Duration;

use clap::Subcommand;
use habitdeck_core::storage::Config;
use habitdeck_core::{calendar, DayCell, Event, HoldTracker, MoveDirection};
use habitdeck_core::{CheckSession, HabitLedger};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Add a new daily habit
    Add {
        /// Habit title
        title: String,
    },
    /// List habits
    List,
    /// Rename a habit
    Rename {
        /// Habit ID
        id: String,
        /// New title
        title: String,
    },
    /// Delete a habit
    Delete {
        /// Habit ID
        id: String,
    },
    /// Move a habit up or down in the list
    Move {
        /// Habit ID
        id: String,
        /// Direction: up or down
        direction: String,
    },
    /// Complete a habit for today via the hold gesture
    Check {
        /// Habit ID
        id: String,
        /// Skip the hold and mark completed immediately
        #[arg(long)]
        now: bool,
    },
    /// Set or clear the note for a day
    Note {
        /// Habit ID
        id: String,
        /// Note text (empty clears the note)
        #[arg(default_value = "")]
        text: String,
        /// Day key (YYYY-MM-DD), defaults to today
        #[arg(long)]
        day: Option<String>,
    },
    /// Show a month calendar for a habit
    Calendar {
        /// Habit ID
        id: String,
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(long)]
        month: Option<String>,
    },
}

pub fn run(action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut state = crate::common::AppState::load()?;

    match action {
        HabitAction::Add { title } => {
            let task = state.ledger.create(&title)?;
            println!("Habit created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(task)?);
            state.save()?;
        }
        HabitAction::List => {
            let today = calendar::today_key();
            for task in state.ledger.tasks() {
                let mark = if task.is_completed(&today) { "x" } else { " " };
                println!(
                    "[{mark}] {}  ({} days)  {}",
                    task.title,
                    task.completion_count(),
                    task.id
                );
            }
        }
        HabitAction::Rename { id, title } => {
            if state.ledger.get(&id).is_none() {
                return Err(format!("Habit not found: {id}").into());
            }
            state.ledger.rename(&id, &title)?;
            println!("Habit renamed: {id}");
            state.save()?;
        }
        HabitAction::Delete { id } => {
            let mut session = CheckSession::default();
            if !session.delete_task(&mut state.ledger, &id) {
                return Err(format!("Habit not found: {id}").into());
            }
            println!("Habit deleted: {id}");
            state.save()?;
        }
        HabitAction::Move { id, direction } => {
            let direction = match direction.as_str() {
                "up" => MoveDirection::Up,
                "down" => MoveDirection::Down,
                other => return Err(format!("unknown direction: {other}").into()),
            };
            state.ledger.reorder(&id, direction);
            state.save()?;
        }
        HabitAction::Check { id, now } => {
            check(&mut state.ledger, &id, now)?;
            state.save()?;
        }
        HabitAction::Note { id, text, day } => {
            if state.ledger.get(&id).is_none() {
                return Err(format!("Habit not found: {id}").into());
            }
            let day = match day {
                Some(key) => calendar::parse_day_key(&key)
                    .ok_or_else(|| format!("invalid day key: {key}"))?,
                None => calendar::today(),
            };
            state.ledger.set_note_on(&id, day, &text);
            let saved = state.ledger.note(&id, &calendar::day_key(day));
            if saved.is_empty() {
                println!("Note cleared for {}", calendar::day_key(day));
            } else {
                println!("Note for {}: {saved}", calendar::day_key(day));
            }
            state.save()?;
        }
        HabitAction::Calendar { id, month } => {
            let today = calendar::today();
            let month = match month {
                Some(ref text) => parse_month(text)?,
                None => calendar::month_start(today),
            };
            let cells = state.ledger.calendar_window(&id, month, today);
            if cells.is_empty() {
                return Err(format!("Habit not found: {id}").into());
            }
            print_grid(month, &cells);
        }
    }
    Ok(())
}

/// Run the hold gesture to completion, polling the tracker the way the UI
/// would. `--now` skips the wait.
fn check(
    ledger: &mut HabitLedger,
    id: &str,
    now: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let task = ledger
        .get(id)
        .ok_or_else(|| format!("Habit not found: {id}"))?;
    if task.is_completed(&calendar::today_key()) {
        println!("{} is already completed today", task.title);
        return Ok(());
    }
    let title = task.title.clone();
    let config = Config::load_or_default();

    if now {
        ledger.mark_completed_today(id);
    } else {
        let mut session = CheckSession::new(HoldTracker::new(config.hold_duration_ms()));
        session.start_hold(ledger, id);
        loop {
            print!("\rholding... {:>3.0}%", session.hold().progress() * 100.0);
            std::io::stdout().flush()?;
            if let Some(Event::HoldCompleted { .. }) = session.tick(ledger) {
                println!();
                break;
            }
            std::thread::sleep(Duration::from_millis(100));
        }
    }

    if config.hold.celebration {
        println!("\u{1f389} {title} completed for today!");
    } else {
        println!("{title} completed for today");
    }
    Ok(())
}

fn parse_month(text: &str) -> Result<chrono::NaiveDate, Box<dyn std::error::Error>> {
    calendar::parse_day_key(&format!("{text}-01"))
        .ok_or_else(|| format!("invalid month: {text} (expected YYYY-MM)").into())
}

/// Render a Sunday-first month grid. Completed days are marked with `*`,
/// out-of-range days print as dots.
fn print_grid(month: chrono::NaiveDate, cells: &[DayCell]) {
    println!("{}", month.format("%B %Y"));
    println!(" Su  Mo  Tu  We  Th  Fr  Sa");
    for row in cells.chunks(7) {
        let mut line = String::new();
        for cell in row {
            match cell {
                DayCell::Pad => line.push_str("    "),
                DayCell::OutOfRange { .. } => line.push_str("  . "),
                DayCell::Day {
                    date, completed, ..
                } => {
                    use chrono::Datelike;
                    let mark = if *completed { '*' } else { ' ' };
                    line.push_str(&format!("{:>3}{mark}", date.day()));
                }
            }
        }
        println!("{}", line.trim_end());
    }
}
