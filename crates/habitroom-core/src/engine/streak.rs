//! Status updates for today's ledger row and the streak they drive.

use chrono::NaiveDate;

use crate::error::{CoreError, Result};
use crate::habit::{HabitId, HabitStatus, HabitView, UserId};
use crate::storage::{HabitStore, HistoryStore, StreakStore, Transactional};

/// Set today's status for one habit and recompute its streak.
///
/// Preconditions are checked in order: the habit must be enabled and owned
/// by `user_id`, its streak row must exist, and today's ledger row must
/// exist (reconcile first). The read-modify-write runs in one transaction,
/// so concurrent updates of the same habit serialize and a failed write
/// leaves both rows untouched.
///
/// Completing a day that is already COMPLETED changes nothing.
pub fn update_today_status<S>(
    store: &S,
    user_id: UserId,
    habit_id: HabitId,
    status: HabitStatus,
    today: NaiveDate,
) -> Result<HabitView>
where
    S: HabitStore + StreakStore + HistoryStore + Transactional,
{
    store.transaction(|s| {
        let habit = s
            .get_enabled_for_user(user_id, habit_id)?
            .ok_or(CoreError::HabitNotFound(habit_id))?;
        let mut streak = s
            .get_streak(habit.id)?
            .ok_or(CoreError::StreakNotFound(habit.id))?;
        let mut entry = s
            .find_entry(habit.id, today)?
            .ok_or(CoreError::HistoryNotFound {
                habit_id: habit.id,
                day: today,
            })?;

        let previous = entry.status;
        if previous == HabitStatus::Completed && status == HabitStatus::Completed {
            return Ok(HabitView::new(&habit, &streak, Some(previous)));
        }

        streak.apply(status, today, habit.active_days);
        entry.status = status;
        s.save_entry(&entry)?;
        s.save_streak(&streak)?;

        tracing::info!(
            habit_id = habit.id,
            from = %previous,
            to = %status,
            current_streak = streak.current_streak,
            longest_streak = streak.longest_streak,
            "habit status updated"
        );
        Ok(HabitView::new(&habit, &streak, Some(entry.status)))
    })
}
