use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{HabitId, HabitStatus};
use crate::calendar::WeekdaySet;

/// Running and best streak for one habit.
///
/// `longest_streak >= current_streak` holds after every [`apply`](Self::apply).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub habit_id: HabitId,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completed_date: Option<NaiveDate>,
}

impl StreakState {
    /// Zeroed state written alongside a new habit.
    pub fn new(habit_id: HabitId) -> Self {
        Self {
            habit_id,
            current_streak: 0,
            longest_streak: 0,
            last_completed_date: None,
        }
    }

    /// Apply today's status.
    ///
    /// A completion continues the streak only when the previous scheduled day
    /// was the last completion; anything else starts over at 1. A non-completed
    /// status zeroes the running count but keeps `last_completed_date`.
    pub fn apply(&mut self, status: HabitStatus, today: NaiveDate, active_days: WeekdaySet) {
        match status {
            HabitStatus::Completed => {
                let prev = active_days.previous_active_date(today);
                self.current_streak = if self.last_completed_date == Some(prev) {
                    self.current_streak.saturating_add(1)
                } else {
                    1
                };
                self.longest_streak = self.longest_streak.max(self.current_streak);
                self.last_completed_date = Some(today);
            }
            HabitStatus::Missed | HabitStatus::Pending => {
                self.current_streak = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(d: u32) -> NaiveDate {
        // October 2026: the 19th is a Monday
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    fn weekdays() -> WeekdaySet {
        WeekdaySet::new([Weekday::Mon, Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri])
            .unwrap()
    }

    #[test]
    fn first_completion_starts_at_one() {
        let mut s = StreakState::new(1);
        s.apply(HabitStatus::Completed, date(19), weekdays());
        assert_eq!((s.current_streak, s.longest_streak), (1, 1));
        assert_eq!(s.last_completed_date, Some(date(19)));
    }

    #[test]
    fn completion_after_previous_active_day_continues() {
        let mut s = StreakState {
            habit_id: 1,
            current_streak: 4,
            longest_streak: 6,
            last_completed_date: Some(date(16)), // Friday
        };
        // Monday: the weekend is not scheduled, Friday is the previous active day.
        s.apply(HabitStatus::Completed, date(19), weekdays());
        assert_eq!((s.current_streak, s.longest_streak), (5, 6));
    }

    #[test]
    fn gap_resets_to_one_and_keeps_longest() {
        let mut s = StreakState {
            habit_id: 1,
            current_streak: 3,
            longest_streak: 3,
            last_completed_date: Some(date(14)),
        };
        s.apply(HabitStatus::Completed, date(19), weekdays());
        assert_eq!((s.current_streak, s.longest_streak), (1, 3));
    }

    #[test]
    fn missed_zeroes_current_but_keeps_last_completion() {
        let mut s = StreakState {
            habit_id: 1,
            current_streak: 2,
            longest_streak: 2,
            last_completed_date: Some(date(20)),
        };
        s.apply(HabitStatus::Missed, date(21), weekdays());
        assert_eq!(s.current_streak, 0);
        assert_eq!(s.longest_streak, 2);
        assert_eq!(s.last_completed_date, Some(date(20)));
    }

    #[test]
    fn weekday_scenario_runs_one_two_zero_one() {
        let mut s = StreakState::new(1);
        let mut seen = Vec::new();
        for (day, status) in [
            (19, HabitStatus::Completed),
            (20, HabitStatus::Completed),
            (21, HabitStatus::Missed),
            (22, HabitStatus::Completed),
        ] {
            s.apply(status, date(day), weekdays());
            seen.push(s.current_streak);
            assert!(s.longest_streak >= s.current_streak);
        }
        assert_eq!(seen, vec![1, 2, 0, 1]);
        assert_eq!(s.longest_streak, 2);
    }
}
