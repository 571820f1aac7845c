//! Store contracts consumed by the reconciliation and streak engines.
//!
//! The engines never touch SQL; they speak to these traits. [`HabitDb`]
//! implements all of them over one connection.
//!
//! [`HabitDb`]: super::HabitDb

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::habit::{
    Category, Habit, HabitDraft, HabitId, HistoryEntry, NewHistoryEntry, StreakState, UserId,
};

/// Habit definitions.
pub trait HabitStore {
    /// Any habit by id, enabled or not.
    fn get_habit(&self, id: HabitId) -> Result<Option<Habit>>;

    /// A habit owned by `user_id`, enabled or not.
    fn get_habit_for_user(&self, user_id: UserId, id: HabitId) -> Result<Option<Habit>>;

    /// An enabled habit owned by `user_id`.
    fn get_enabled_for_user(&self, user_id: UserId, id: HabitId) -> Result<Option<Habit>>;

    /// All enabled habits of a user, in creation order.
    fn list_enabled_for_user(&self, user_id: UserId) -> Result<Vec<Habit>>;

    /// Persist a validated draft.
    fn insert_habit(
        &self,
        user_id: UserId,
        draft: &HabitDraft,
        category: &Category,
        created_at: DateTime<Utc>,
        created_on: NaiveDate,
    ) -> Result<Habit>;

    /// Clear `enabled` on an owned, enabled habit. Returns false when there
    /// was no such habit.
    fn disable_habit(&self, user_id: UserId, id: HabitId) -> Result<bool>;
}

pub trait CategoryStore {
    fn find_category_by_name(&self, name: &str) -> Result<Option<Category>>;

    fn list_categories(&self) -> Result<Vec<Category>>;
}

/// One streak row per habit.
pub trait StreakStore {
    fn get_streak(&self, habit_id: HabitId) -> Result<Option<StreakState>>;

    /// Upsert keyed by habit id.
    fn save_streak(&self, streak: &StreakState) -> Result<()>;
}

/// Per-(habit, day) ledger.
pub trait HistoryStore {
    fn find_entry(&self, habit_id: HabitId, day: NaiveDate) -> Result<Option<HistoryEntry>>;

    /// Latest day with a row for this habit.
    fn last_day_for_habit(&self, habit_id: HabitId) -> Result<Option<NaiveDate>>;

    /// Insert rows in one round trip. Rows whose `(habit, day)` already
    /// exists are skipped; the return value counts rows actually written.
    fn insert_batch(&self, entries: &[NewHistoryEntry]) -> Result<usize>;

    /// Overwrite the status of an existing row.
    fn save_entry(&self, entry: &HistoryEntry) -> Result<()>;

    /// Whole ledger of one habit, ascending by day.
    fn list_for_habit(&self, habit_id: HabitId) -> Result<Vec<HistoryEntry>>;

    /// COMPLETED rows per day across a user's habits within `[from, to]`.
    fn completed_counts_between(
        &self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, u64>>;
}

/// Atomic units of work.
pub trait Transactional {
    /// Run `f` so that either all of its writes land or none do. Writers on
    /// the same store are serialized for the duration of `f`.
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>;
}

/// Everything the tracker needs from persistence.
pub trait LedgerStore: HabitStore + CategoryStore + StreakStore + HistoryStore + Transactional {}

impl<T> LedgerStore for T where T: HabitStore + CategoryStore + StreakStore + HistoryStore + Transactional {}
