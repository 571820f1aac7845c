//! Caller-facing operations.
//!
//! [`HabitTracker`] ties a store to a clock. Every operation takes the
//! acting user explicitly; nothing is read from ambient request state.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::clock::{Clock, SystemClock};
use crate::engine::{self, ReconcileReport};
use crate::error::{CoreError, Result};
use crate::habit::{
    Category, HabitId, HabitStatus, HabitView, HistoryEntry, NewHabit, NewHistoryEntry,
    StreakState, UserId,
};
use crate::stats::{self, HistoryRange};
use crate::storage::LedgerStore;

/// Default trailing window for [`HistoryRange::Current`].
pub const DEFAULT_HEATMAP_WINDOW_DAYS: u32 = 365;

pub struct HabitTracker<S, C = SystemClock> {
    store: S,
    clock: C,
    heatmap_window_days: u32,
}

impl<S: LedgerStore> HabitTracker<S, SystemClock> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: LedgerStore, C: Clock> HabitTracker<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            heatmap_window_days: DEFAULT_HEATMAP_WINDOW_DAYS,
        }
    }

    pub fn with_heatmap_window(mut self, days: u32) -> Self {
        self.heatmap_window_days = days;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Backfill the user's ledger up to today.
    pub fn reconcile(&self, user_id: UserId) -> Result<ReconcileReport> {
        engine::ensure_history_up_to(&self.store, user_id, self.today())
    }

    /// Enabled habits scheduled today, with today's status. Reconciles first.
    ///
    /// # Errors
    /// A habit missing its streak or today's row after reconciliation is a
    /// [`CoreError::Consistency`] failure.
    pub fn list_today(&self, user_id: UserId) -> Result<Vec<HabitView>> {
        let today = self.today();
        engine::ensure_history_up_to(&self.store, user_id, today)?;

        self.store
            .list_enabled_for_user(user_id)?
            .into_iter()
            .filter(|habit| habit.is_active_on(today))
            .map(|habit| {
                let streak = self.store.get_streak(habit.id)?.ok_or_else(|| {
                    CoreError::Consistency(format!("streak missing for habit {}", habit.id))
                })?;
                let entry = self.store.find_entry(habit.id, today)?.ok_or_else(|| {
                    CoreError::Consistency(format!(
                        "history missing for habit {} on {today}",
                        habit.id
                    ))
                })?;
                Ok(HabitView::new(&habit, &streak, Some(entry.status)))
            })
            .collect()
    }

    /// All enabled habits with their streak snapshot; no reconciliation.
    pub fn list_all(&self, user_id: UserId) -> Result<Vec<HabitView>> {
        self.store
            .list_enabled_for_user(user_id)?
            .into_iter()
            .map(|habit| {
                let streak = self.store.get_streak(habit.id)?.ok_or_else(|| {
                    CoreError::Consistency(format!("streak missing for habit {}", habit.id))
                })?;
                Ok(HabitView::new(&habit, &streak, None))
            })
            .collect()
    }

    /// Set today's status and recompute the streak.
    pub fn update_status(
        &self,
        user_id: UserId,
        habit_id: HabitId,
        status: HabitStatus,
    ) -> Result<HabitView> {
        engine::update_today_status(&self.store, user_id, habit_id, status, self.today())
    }

    /// Validate and store a habit with its zeroed streak, plus today's
    /// PENDING row when it is scheduled today.
    ///
    /// # Errors
    /// Validation failures and an unknown category are reported before
    /// anything is written.
    pub fn create_habit(&self, user_id: UserId, request: &NewHabit) -> Result<HabitView> {
        let draft = request.validate()?;
        let category = self
            .store
            .find_category_by_name(&draft.category)?
            .ok_or_else(|| CoreError::CategoryNotFound(draft.category.clone()))?;

        let now = self.clock.now();
        let today = self.today();

        let (habit, streak, status) = self.store.transaction(|s| {
            let habit = s.insert_habit(user_id, &draft, &category, now, today)?;
            let streak = StreakState::new(habit.id);
            s.save_streak(&streak)?;
            let status = if habit.is_active_on(today) {
                s.insert_batch(&[NewHistoryEntry::pending(habit.id, today)])?;
                Some(HabitStatus::Pending)
            } else {
                None
            };
            Ok((habit, streak, status))
        })?;

        tracing::info!(
            habit_id = habit.id,
            user_id,
            name = %habit.name,
            days = %habit.active_days,
            "habit created"
        );
        Ok(HabitView::new(&habit, &streak, status))
    }

    /// Soft-delete a habit. Its ledger rows stay.
    pub fn disable_habit(&self, user_id: UserId, habit_id: HabitId) -> Result<()> {
        if !self.store.disable_habit(user_id, habit_id)? {
            return Err(CoreError::HabitNotFound(habit_id));
        }
        tracing::info!(habit_id, user_id, "habit disabled");
        Ok(())
    }

    /// Ledger of one owned habit, enabled or disabled, ascending by day.
    pub fn history(&self, user_id: UserId, habit_id: HabitId) -> Result<Vec<HistoryEntry>> {
        let habit = self
            .store
            .get_habit_for_user(user_id, habit_id)?
            .ok_or(CoreError::HabitNotFound(habit_id))?;
        self.store.list_for_habit(habit.id)
    }

    /// Completed rows per day, or `None` if there are none in the range.
    pub fn completed_counts(
        &self,
        user_id: UserId,
        range: HistoryRange,
    ) -> Result<Option<BTreeMap<NaiveDate, u64>>> {
        stats::completed_counts(
            &self.store,
            user_id,
            range,
            self.today(),
            self.heatmap_window_days,
        )
    }

    pub fn categories(&self) -> Result<Vec<Category>> {
        self.store.list_categories()
    }
}
