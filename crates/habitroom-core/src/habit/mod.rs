//! Habit definitions and the view record handed back to callers.
//!
//! A habit is owned by one user, scheduled on a [`WeekdaySet`], and soft
//! deleted by clearing `enabled`. Its ledger lives in the history store and
//! its running counters in [`StreakState`].

mod status;
mod streak;

pub use status::{HabitStatus, HistoryEntry, NewHistoryEntry};
pub use streak::StreakState;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::WeekdaySet;
use crate::error::ValidationError;

pub type HabitId = i64;
pub type UserId = i64;
pub type CategoryId = i64;

/// Frequency label that forces a full week.
pub const DAILY: &str = "DAILY";

pub const MAX_NAME_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;
pub const MAX_CATEGORY_LEN: usize = 50;

/// A named bucket habits are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// A stored habit definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub user_id: UserId,
    pub name: String,
    pub description: Option<String>,
    pub category: Category,
    /// Upper-cased label such as `DAILY` or `WEEKLY`.
    pub frequency: String,
    pub active_days: WeekdaySet,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    /// Local calendar day of creation; the ledger starts here.
    pub created_on: NaiveDate,
}

impl Habit {
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.active_days.is_active_on(date)
    }
}

/// Raw creation request, as typed by a user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewHabit {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub frequency: String,
    /// Weekday names, e.g. `["monday", "wed"]`.
    pub days: Vec<String>,
}

/// A creation request that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitDraft {
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub frequency: String,
    pub active_days: WeekdaySet,
}

impl NewHabit {
    /// Check the request and normalize it. Nothing is persisted here.
    ///
    /// # Errors
    /// Returns the first rule the request breaks.
    pub fn validate(&self) -> Result<HabitDraft, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::invalid("name", "is required"));
        }
        if name.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::invalid(
                "name",
                format!("must not exceed {MAX_NAME_LEN} characters"),
            ));
        }

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty());
        if let Some(d) = description {
            if d.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(ValidationError::invalid(
                    "description",
                    format!("must not exceed {MAX_DESCRIPTION_LEN} characters"),
                ));
            }
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::invalid("category", "is required"));
        }
        if category.chars().count() > MAX_CATEGORY_LEN {
            return Err(ValidationError::invalid(
                "category",
                format!("must not exceed {MAX_CATEGORY_LEN} characters"),
            ));
        }

        let frequency = self.frequency.trim().to_uppercase();
        if frequency.is_empty() {
            return Err(ValidationError::invalid("frequency", "is required"));
        }

        if self.days.is_empty() {
            return Err(ValidationError::EmptyCollection("days".into()));
        }
        let active_days = WeekdaySet::from_names(&self.days)?;
        if frequency == DAILY && !active_days.is_all() {
            return Err(ValidationError::DailyRequiresAllDays {
                given: active_days.len(),
            });
        }

        Ok(HabitDraft {
            name: name.to_string(),
            description: description.map(str::to_string),
            category: category.to_string(),
            frequency,
            active_days,
        })
    }
}

/// Habit joined with its streak snapshot and, for "today" listings, today's
/// ledger status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitView {
    pub id: HabitId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub frequency: String,
    pub active_days: WeekdaySet,
    pub status: Option<HabitStatus>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_completed_date: Option<NaiveDate>,
    pub created_at: NaiveDate,
}

impl HabitView {
    pub fn new(habit: &Habit, streak: &StreakState, status: Option<HabitStatus>) -> Self {
        Self {
            id: habit.id,
            name: habit.name.clone(),
            description: habit.description.clone(),
            category: habit.category.name.clone(),
            frequency: habit.frequency.clone(),
            active_days: habit.active_days,
            status,
            current_streak: streak.current_streak,
            longest_streak: streak.longest_streak,
            last_completed_date: streak.last_completed_date,
            created_at: habit.created_on,
        }
    }
}
