//! Integration tests for ledger reconciliation and streaks through the
//! public tracker API.

use chrono::{Datelike, NaiveDate, Weekday};
use habitroom_core::calendar::days_between;
use habitroom_core::storage::HistoryStore;
use habitroom_core::{
    CoreError, FixedClock, HabitDb, HabitStatus, HabitTracker, NewHabit, ValidationError,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tracker_at(today: NaiveDate) -> HabitTracker<HabitDb, FixedClock> {
    let db = HabitDb::open_memory().unwrap();
    db.seed_categories(&["Fitness"]).unwrap();
    HabitTracker::with_clock(db, FixedClock::new(today))
}

fn new_habit(frequency: &str, days: &[&str]) -> NewHabit {
    NewHabit {
        name: "Swim".to_string(),
        description: None,
        category: "fitness".to_string(),
        frequency: frequency.to_string(),
        days: days.iter().map(|d| d.to_string()).collect(),
    }
}

#[test]
fn test_mon_wed_fri_gap_fill_for_every_starting_weekday() {
    // Run the ten-day scenario with "today" on each day of one week.
    for offset in 0..7 {
        let today = date(2026, 10, 19) + chrono::Duration::days(offset);
        let created = today - chrono::Duration::days(10);
        let t = tracker_at(created);
        let view = t.create_habit(1, &new_habit("weekly", &["mon", "wed", "fri"])).unwrap();

        t.clock().set(today);
        t.reconcile(1).unwrap();

        let history = t.history(1, view.id).unwrap();
        let expected_past: Vec<NaiveDate> = days_between(created, today.pred_opt().unwrap())
            .filter(|d| matches!(d.weekday(), Weekday::Mon | Weekday::Wed | Weekday::Fri))
            .collect();

        let past: Vec<_> = history.iter().filter(|e| e.day < today).collect();
        assert_eq!(
            past.iter().map(|e| e.day).collect::<Vec<_>>(),
            expected_past,
            "today = {today}"
        );
        // The creation day row (if any) was written PENDING at creation;
        // every backfilled day is MISSED.
        for entry in &past {
            if entry.day != created {
                assert_eq!(entry.status, HabitStatus::Missed);
            }
        }

        let today_rows: Vec<_> = history.iter().filter(|e| e.day == today).collect();
        let active_today = matches!(today.weekday(), Weekday::Mon | Weekday::Wed | Weekday::Fri);
        assert_eq!(today_rows.len(), usize::from(active_today), "today = {today}");
        if active_today {
            assert_eq!(today_rows[0].status, HabitStatus::Pending);
        }
    }
}

#[test]
fn test_reconcile_twice_leaves_ledger_unchanged() {
    let t = tracker_at(date(2026, 9, 1));
    let a = t.create_habit(1, &new_habit("weekly", &["tue", "sat"])).unwrap();
    let b = t.create_habit(1, &new_habit("weekly", &["sun"])).unwrap();

    t.clock().set(date(2026, 10, 19));
    t.reconcile(1).unwrap();
    let before = (t.history(1, a.id).unwrap(), t.history(1, b.id).unwrap());

    let report = t.reconcile(1).unwrap();
    assert_eq!(report.rows_inserted, 0);
    assert_eq!(report.habits_checked, 2);
    assert_eq!((t.history(1, a.id).unwrap(), t.history(1, b.id).unwrap()), before);
}

#[test]
fn test_weekday_streak_scenario() {
    // Monday 2026-10-19
    let t = tracker_at(date(2026, 10, 19));
    let view = t
        .create_habit(1, &new_habit("weekdays", &["mon", "tue", "wed", "thu", "fri"]))
        .unwrap();

    let mut currents = Vec::new();
    let mut longest = Vec::new();
    for status in [
        HabitStatus::Completed,
        HabitStatus::Completed,
        HabitStatus::Missed,
        HabitStatus::Completed,
    ] {
        let listed = t.list_today(1).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, Some(HabitStatus::Pending));

        let updated = t.update_status(1, view.id, status).unwrap();
        currents.push(updated.current_streak);
        longest.push(updated.longest_streak);
        t.clock().advance_days(1);
    }

    assert_eq!(currents, vec![1, 2, 0, 1]);
    assert_eq!(longest, vec![1, 2, 2, 2]);
}

#[test]
fn test_missed_keeps_last_completed_date() {
    let t = tracker_at(date(2026, 10, 19));
    let view = t
        .create_habit(1, &new_habit("daily", &["mon", "tue", "wed", "thu", "fri", "sat", "sun"]))
        .unwrap();
    t.update_status(1, view.id, HabitStatus::Completed).unwrap();

    t.clock().advance_days(1);
    t.list_today(1).unwrap();
    let missed = t.update_status(1, view.id, HabitStatus::Missed).unwrap();
    assert_eq!(missed.current_streak, 0);
    assert_eq!(missed.longest_streak, 1);
    assert_eq!(missed.last_completed_date, Some(date(2026, 10, 19)));
}

#[test]
fn test_completion_after_skipped_day_resets_to_one() {
    let t = tracker_at(date(2026, 10, 19));
    let view = t
        .create_habit(1, &new_habit("daily", &["mon", "tue", "wed", "thu", "fri", "sat", "sun"]))
        .unwrap();
    t.update_status(1, view.id, HabitStatus::Completed).unwrap();
    t.clock().advance_days(1);
    t.list_today(1).unwrap();
    t.update_status(1, view.id, HabitStatus::Completed).unwrap();

    // Skip two days without touching the ledger.
    t.clock().advance_days(3);
    t.list_today(1).unwrap();
    let view = t.update_status(1, view.id, HabitStatus::Completed).unwrap();
    assert_eq!(view.current_streak, 1);
    assert_eq!(view.longest_streak, 2);

    let statuses: Vec<_> = t
        .history(1, view.id)
        .unwrap()
        .into_iter()
        .map(|e| e.status)
        .collect();
    assert_eq!(
        statuses,
        vec![
            HabitStatus::Completed,
            HabitStatus::Completed,
            HabitStatus::Missed,
            HabitStatus::Missed,
            HabitStatus::Completed,
        ]
    );
}

#[test]
fn test_update_without_todays_row_is_history_not_found() {
    let t = tracker_at(date(2026, 10, 19));
    let view = t.create_habit(1, &new_habit("weekly", &["tue"])).unwrap();
    let err = t.update_status(1, view.id, HabitStatus::Completed).unwrap_err();
    assert!(matches!(err, CoreError::HistoryNotFound { .. }));
    assert!(err.is_not_found());
}

#[test]
fn test_daily_with_partial_week_is_rejected_before_persistence() {
    let t = tracker_at(date(2026, 10, 19));
    let err = t
        .create_habit(1, &new_habit("Daily", &["mon", "wed", "fri"]))
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation(ValidationError::DailyRequiresAllDays { given: 3 })
    ));
    assert!(t.list_all(1).unwrap().is_empty());
    let rows: i64 = t
        .store()
        .conn()
        .query_row("SELECT COUNT(*) FROM habits", [], |r| r.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[test]
fn test_disabled_habit_history_remains_queryable() {
    let t = tracker_at(date(2026, 10, 19));
    let view = t.create_habit(1, &new_habit("weekly", &["mon", "thu"])).unwrap();
    t.update_status(1, view.id, HabitStatus::Completed).unwrap();
    t.disable_habit(1, view.id).unwrap();

    t.clock().advance_days(14);
    assert_eq!(t.reconcile(1).unwrap().habits_checked, 0);
    assert!(t.list_today(1).unwrap().is_empty());
    assert!(t.list_all(1).unwrap().is_empty());

    assert_eq!(t.store().list_for_habit(view.id).unwrap().len(), 1);
    let counts = t
        .completed_counts(1, habitroom_core::HistoryRange::Current)
        .unwrap()
        .unwrap();
    assert_eq!(counts.get(&date(2026, 10, 19)), Some(&1));
}
