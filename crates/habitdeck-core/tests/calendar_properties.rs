//! Property tests for calendar windows and list reordering.

use chrono::{Datelike, NaiveDate};
use habitdeck_core::{calendar, DayCell, HabitLedger, MoveDirection};
use proptest::prelude::*;

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (1990i32..=2100, 1u32..=12, 1u32..=31).prop_map(|(y, m, d)| {
        let first = NaiveDate::from_ymd_opt(y, m, 1).unwrap();
        let day = d.min(calendar::days_in_month(first));
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    })
}

proptest! {
    #[test]
    fn month_cells_are_whole_weeks(date in arb_date()) {
        let cells = calendar::month_cells(date);
        prop_assert_eq!(cells.len() % 7, 0);
        // Every day of the month appears exactly once, in order.
        let days: Vec<u32> = cells.iter().flatten().map(|d| d.day()).collect();
        let expected: Vec<u32> = (1..=calendar::days_in_month(date)).collect();
        prop_assert_eq!(days, expected);
    }

    #[test]
    fn month_cells_start_sunday_aligned(date in arb_date()) {
        let cells = calendar::month_cells(date);
        let leading = cells.iter().take_while(|c| c.is_none()).count();
        let first = calendar::month_start(date);
        prop_assert_eq!(leading as u32, first.weekday().num_days_from_sunday());
    }

    #[test]
    fn day_key_roundtrips(date in arb_date()) {
        let key = calendar::day_key(date);
        prop_assert_eq!(calendar::parse_day_key(&key), Some(date));
    }

    #[test]
    fn add_months_is_invertible(date in arb_date(), delta in -600i32..=600) {
        let there = calendar::add_months(date, delta);
        let back = calendar::add_months(there, -delta);
        prop_assert_eq!(back, calendar::month_start(date));
    }

    #[test]
    fn window_days_fall_inside_creation_and_today(
        created in arb_date(),
        month_offset in 0i32..=24,
        today_offset in 0i64..=720,
    ) {
        // Pin the creation day without going through the wall clock.
        let id = "habit-prop";
        let raw = serde_json::json!([{
            "id": id,
            "title": "exercise",
            "createdAt": format!("{}T12:00:00Z", calendar::day_key(created)),
        }]);
        let ledger: HabitLedger = serde_json::from_value(raw).unwrap();
        let created_day = ledger.tasks()[0].created_day();

        let today = created_day + chrono::Duration::days(today_offset);
        let month = calendar::add_months(created_day, month_offset);
        let cells = ledger.calendar_window(id, month, today);

        prop_assert_eq!(cells.len() % 7, 0);
        for cell in &cells {
            if let DayCell::Day { date, key, .. } = cell {
                prop_assert!(*date >= created_day && *date <= today);
                prop_assert_eq!(calendar::parse_day_key(key), Some(*date));
            }
        }
    }

    #[test]
    fn reorder_preserves_id_multiset(
        count in 1usize..=8,
        moves in prop::collection::vec((0usize..8, prop::bool::ANY), 0..=20),
    ) {
        let mut ledger = HabitLedger::default();
        for i in 0..count {
            ledger.create(&format!("habit {i}")).unwrap();
        }
        let mut before: Vec<String> =
            ledger.tasks().iter().map(|t| t.id.clone()).collect();

        for (index, up) in moves {
            if let Some(task) = ledger.tasks().get(index % count) {
                let id = task.id.clone();
                let direction = if up { MoveDirection::Up } else { MoveDirection::Down };
                ledger.reorder(&id, direction);
            }
        }

        let mut after: Vec<String> =
            ledger.tasks().iter().map(|t| t.id.clone()).collect();
        before.sort();
        after.sort();
        prop_assert_eq!(before, after);
    }
}
