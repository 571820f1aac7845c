//! Weekday sets and calendar-date helpers.
//!
//! A habit is scheduled on a non-empty subset of the week. Everything that
//! asks "is this day scheduled?" or "which scheduled day came before today?"
//! goes through [`WeekdaySet`], so streak continuation and ledger backfill
//! agree on what an active day is.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ValidationError;

const ALL_BITS: u8 = 0b0111_1111;

/// Weekdays in storage/display order (Monday first).
pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Non-empty set of weekdays, packed as a 7-bit mask (bit 0 = Monday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// Build a set from weekdays; duplicates are ignored.
    ///
    /// # Errors
    /// Returns `EmptyCollection` if no weekday is given.
    pub fn new<I>(days: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = Weekday>,
    {
        let bits = days
            .into_iter()
            .fold(0u8, |acc, day| acc | (1 << day.num_days_from_monday()));
        Self::from_bits(bits)
    }

    /// All seven days.
    pub fn all() -> Self {
        Self(ALL_BITS)
    }

    /// Rebuild a set from its storage mask.
    ///
    /// # Errors
    /// Returns `EmptyCollection` for a zero mask and `InvalidValue` if bits
    /// above Sunday are set.
    pub fn from_bits(bits: u8) -> Result<Self, ValidationError> {
        if bits & !ALL_BITS != 0 {
            return Err(ValidationError::invalid(
                "active_days",
                format!("mask {bits:#010b} has bits outside the week"),
            ));
        }
        if bits == 0 {
            return Err(ValidationError::EmptyCollection("active_days".into()));
        }
        Ok(Self(bits))
    }

    /// Parse weekday names such as `"monday"`, `"Wed"` or `"FRIDAY"`.
    ///
    /// # Errors
    /// Returns `UnknownWeekday` for the first unparseable name and
    /// `EmptyCollection` if `names` is empty.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, ValidationError> {
        let days = names
            .iter()
            .map(|name| {
                let name = name.as_ref().trim();
                Weekday::from_str(name).map_err(|_| ValidationError::UnknownWeekday(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(days)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Always false for a constructed set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn is_all(self) -> bool {
        self.0 == ALL_BITS
    }

    /// Members in Monday-first order.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        WEEK.into_iter().filter(move |day| self.contains(*day))
    }

    /// True iff `date` falls on one of the set's weekdays.
    pub fn is_active_on(self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    /// Latest active date strictly before `from_exclusive`.
    ///
    /// The set is never empty, so the walk ends within seven days.
    pub fn previous_active_date(self, from_exclusive: NaiveDate) -> NaiveDate {
        let mut date = from_exclusive;
        for _ in 0..7 {
            date = date.pred_opt().unwrap_or(NaiveDate::MIN);
            if self.is_active_on(date) {
                return date;
            }
        }
        date
    }
}

impl fmt::Display for WeekdaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.iter().map(weekday_name).collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for WeekdaySet {
    type Err = ValidationError;

    /// Comma-separated weekday names, e.g. `"mon,wed,fri"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let names: Vec<&str> = s.split(',').filter(|p| !p.trim().is_empty()).collect();
        Self::from_names(&names)
    }
}

impl Serialize for WeekdaySet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter().map(weekday_name))
    }
}

impl<'de> Deserialize<'de> for WeekdaySet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        Self::from_names(&names).map_err(serde::de::Error::custom)
    }
}

/// Upper-case English name, e.g. `MONDAY`.
pub fn weekday_name(day: Weekday) -> String {
    match day {
        Weekday::Mon => "MONDAY",
        Weekday::Tue => "TUESDAY",
        Weekday::Wed => "WEDNESDAY",
        Weekday::Thu => "THURSDAY",
        Weekday::Fri => "FRIDAY",
        Weekday::Sat => "SATURDAY",
        Weekday::Sun => "SUNDAY",
    }
    .to_string()
}

/// Every date in `[start, end]`, ascending. Empty when `start > end`.
pub fn days_between(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let count = if start > end {
        0
    } else {
        (end - start).num_days() as u64 + 1
    };
    (0..count).filter_map(move |offset| start.checked_add_days(Days::new(offset)))
}
