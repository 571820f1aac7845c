//! Lazy backfill of the daily ledger.
//!
//! Before anything reads "today", every enabled habit of the user gets one
//! MISSED row for each active day from its creation (or its last ledger row)
//! through yesterday, and one PENDING row for today if today is active.
//! Running it again the same day writes nothing.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar::days_between;
use crate::error::{CoreError, Result};
use crate::habit::{Habit, NewHistoryEntry, UserId};
use crate::storage::{HabitStore, HistoryStore, Transactional};

/// Summary of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Enabled habits examined.
    pub habits_checked: usize,
    /// Ledger rows written (MISSED backfill plus today's PENDING).
    pub rows_inserted: usize,
    /// Planned rows another writer had already inserted.
    pub duplicates_ignored: usize,
}

/// Rows a habit is missing as of `today`, in ascending day order.
///
/// The gap starts the day after the latest ledger row, or on the creation
/// day when the ledger is empty, and ends yesterday. Today is handled
/// separately so a habit created today still gets its PENDING row.
pub fn missing_entries<S>(store: &S, habit: &Habit, today: NaiveDate) -> Result<Vec<NewHistoryEntry>>
where
    S: HistoryStore + ?Sized,
{
    let mut planned = Vec::new();

    let gap_start = match store.last_day_for_habit(habit.id)? {
        Some(last) => last.checked_add_days(Days::new(1)),
        None => Some(habit.created_on),
    };
    let yesterday = today.pred_opt();

    if let (Some(from), Some(to)) = (gap_start, yesterday) {
        for day in days_between(from, to) {
            if habit.is_active_on(day) && store.find_entry(habit.id, day)?.is_none() {
                planned.push(NewHistoryEntry::missed(habit.id, day));
            }
        }
    }

    if habit.created_on <= today
        && habit.is_active_on(today)
        && store.find_entry(habit.id, today)?.is_none()
    {
        planned.push(NewHistoryEntry::pending(habit.id, today));
    }

    Ok(planned)
}

/// Bring every enabled habit of `user_id` up to `today`.
///
/// Habits are reconciled independently, each in its own transaction. If any
/// fails the others are still attempted and the call returns
/// [`CoreError::ReconcileIncomplete`] naming the habits left behind.
///
/// # Errors
/// Fails immediately if the habit list cannot be read.
pub fn ensure_history_up_to<S>(store: &S, user_id: UserId, today: NaiveDate) -> Result<ReconcileReport>
where
    S: HabitStore + HistoryStore + Transactional,
{
    let habits = store.list_enabled_for_user(user_id)?;
    let mut report = ReconcileReport::default();
    let mut failed = Vec::new();

    for habit in &habits {
        let outcome = store.transaction(|s| {
            let planned = missing_entries(s, habit, today)?;
            let inserted = s.insert_batch(&planned)?;
            Ok((planned, inserted))
        });

        match outcome {
            Ok((planned, inserted)) => {
                report.habits_checked += 1;
                report.rows_inserted += inserted;
                let skipped = planned.len().saturating_sub(inserted);
                if skipped > 0 {
                    tracing::warn!(habit_id = habit.id, skipped, "ledger rows already present");
                    report.duplicates_ignored += skipped;
                }
                tracing::debug!(habit_id = habit.id, inserted, "habit reconciled");
            }
            Err(err) => {
                tracing::warn!(habit_id = habit.id, error = %err, "history reconciliation failed");
                failed.push(habit.id);
            }
        }
    }

    if !failed.is_empty() {
        return Err(CoreError::ReconcileIncomplete { failed });
    }

    if report.rows_inserted > 0 {
        tracing::info!(user_id, rows = report.rows_inserted, "ledger backfilled");
    }
    Ok(report)
}
