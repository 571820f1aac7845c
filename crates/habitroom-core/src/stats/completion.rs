//! Per-day completion counts for heatmap-style views.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::habit::UserId;
use crate::storage::HistoryStore;

/// Which days a completion count covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryRange {
    /// Trailing window ending today.
    Current,
    /// One calendar year.
    Year(i32),
}

impl HistoryRange {
    /// Inclusive `(from, to)` bounds.
    ///
    /// # Errors
    /// Returns `InvalidValue` for a year chrono cannot represent.
    pub fn bounds(self, today: NaiveDate, window_days: u32) -> Result<(NaiveDate, NaiveDate), ValidationError> {
        match self {
            HistoryRange::Current => {
                let from = today
                    .checked_sub_days(Days::new(u64::from(window_days)))
                    .unwrap_or(NaiveDate::MIN);
                Ok((from, today))
            }
            HistoryRange::Year(year) => {
                let from = NaiveDate::from_ymd_opt(year, 1, 1);
                let to = NaiveDate::from_ymd_opt(year, 12, 31);
                from.zip(to)
                    .ok_or_else(|| ValidationError::invalid("year", format!("{year} is out of range")))
            }
        }
    }
}

impl fmt::Display for HistoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryRange::Current => f.write_str("current"),
            HistoryRange::Year(year) => write!(f, "{year}"),
        }
    }
}

impl FromStr for HistoryRange {
    type Err = ValidationError;

    /// `"current"` (any case) or a year such as `"2025"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("current") {
            return Ok(HistoryRange::Current);
        }
        s.parse::<i32>()
            .map(HistoryRange::Year)
            .map_err(|_| ValidationError::invalid("year", format!("expected 'current' or a year, got '{s}'")))
    }
}

/// COMPLETED rows per day for a user's habits, disabled ones included.
///
/// Returns `None` when nothing was completed in the range.
pub fn completed_counts<S>(
    store: &S,
    user_id: UserId,
    range: HistoryRange,
    today: NaiveDate,
    window_days: u32,
) -> Result<Option<BTreeMap<NaiveDate, u64>>>
where
    S: HistoryStore + ?Sized,
{
    let (from, to) = range.bounds(today, window_days)?;
    let counts = store.completed_counts_between(user_id, from, to)?;
    Ok((!counts.is_empty()).then_some(counts))
}
