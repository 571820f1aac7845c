use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::HabitId;
use crate::error::ValidationError;

/// Status of one habit on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HabitStatus {
    /// Scheduled today, not yet resolved
    Pending,
    Completed,
    /// Past scheduled day with no completion, or explicitly missed today
    Missed,
}

impl HabitStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HabitStatus::Pending => "PENDING",
            HabitStatus::Completed => "COMPLETED",
            HabitStatus::Missed => "MISSED",
        }
    }
}

impl fmt::Display for HabitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HabitStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(HabitStatus::Pending),
            "COMPLETED" | "DONE" => Ok(HabitStatus::Completed),
            "MISSED" => Ok(HabitStatus::Missed),
            other => Err(ValidationError::invalid(
                "status",
                format!("'{other}' is not one of PENDING, COMPLETED, MISSED"),
            )),
        }
    }
}

/// One ledger row: a habit's status on a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub habit_id: HabitId,
    pub day: NaiveDate,
    pub status: HabitStatus,
}

/// A ledger row that has not been written yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub habit_id: HabitId,
    pub day: NaiveDate,
    pub status: HabitStatus,
}

impl NewHistoryEntry {
    pub fn missed(habit_id: HabitId, day: NaiveDate) -> Self {
        Self { habit_id, day, status: HabitStatus::Missed }
    }

    pub fn pending(habit_id: HabitId, day: NaiveDate) -> Self {
        Self { habit_id, day, status: HabitStatus::Pending }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("completed".parse::<HabitStatus>().unwrap(), HabitStatus::Completed);
        assert_eq!("done".parse::<HabitStatus>().unwrap(), HabitStatus::Completed);
        assert_eq!(" Missed ".parse::<HabitStatus>().unwrap(), HabitStatus::Missed);
        assert!("skipped".parse::<HabitStatus>().is_err());
    }

    #[test]
    fn status_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&HabitStatus::Pending).unwrap(), "\"PENDING\"");
        assert_eq!(HabitStatus::Missed.to_string(), "MISSED");
    }
}
