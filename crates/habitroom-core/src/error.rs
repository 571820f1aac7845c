//! Core error types for habitroom-core.
//!
//! Errors fall into three groups: user-correctable lookups (`*NotFound`),
//! input rejected before any write (`Validation`), and internal failures
//! (`Consistency`, `StreakNotFound`, `Database`). Duplicate ledger inserts are
//! absorbed by the history store and never reach callers.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::habit::HabitId;

/// Core error type for habitroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// No enabled habit with this id is owned by the caller
    #[error("Habit {0} not found")]
    HabitNotFound(HabitId),

    /// Category lookup by name failed
    #[error("Category '{0}' not found")]
    CategoryNotFound(String),

    /// The streak row that should accompany every habit is missing
    #[error("Streak record for habit {0} not found")]
    StreakNotFound(HabitId),

    /// No ledger entry for the requested day; reconcile first
    #[error("No history entry for habit {habit_id} on {day}")]
    HistoryNotFound { habit_id: HabitId, day: NaiveDate },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Rows that reconciliation guarantees are absent
    #[error("Consistency error: {0}")]
    Consistency(String),

    /// Some habits could not be reconciled; the listed ones are behind
    #[error("History reconciliation incomplete for habits {failed:?}")]
    ReconcileIncomplete { failed: Vec<HabitId> },

    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    /// Whether the caller can fix this by naming something that exists.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::HabitNotFound(_)
                | CoreError::CategoryNotFound(_)
                | CoreError::StreakNotFound(_)
                | CoreError::HistoryNotFound { .. }
        )
    }

    /// Whether this indicates a bug or storage failure rather than bad input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            CoreError::StreakNotFound(_)
                | CoreError::Consistency(_)
                | CoreError::ReconcileIncomplete { .. }
                | CoreError::Database(_)
        )
    }
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Unique constraint rejected a row
    #[error("Duplicate row: {0}")]
    Duplicate(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// DAILY frequency with a partial week
    #[error("DAILY habits must be active on all 7 days (got {given})")]
    DailyRequiresAllDays { given: usize },

    /// Weekday name that chrono cannot parse
    #[error("Unknown weekday: '{0}'")]
    UnknownWeekday(String),
}

impl ValidationError {
    pub(crate) fn invalid(field: &str, message: impl Into<String>) -> Self {
        ValidationError::InvalidValue {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, msg) => match code.code {
                rusqlite::ErrorCode::DatabaseLocked | rusqlite::ErrorCode::DatabaseBusy => {
                    DatabaseError::Locked
                }
                rusqlite::ErrorCode::ConstraintViolation
                    if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        || code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
                {
                    DatabaseError::Duplicate(msg.clone().unwrap_or_else(|| err.to_string()))
                }
                _ => DatabaseError::QueryFailed(err.to_string()),
            },
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_family_is_user_correctable() {
        assert!(CoreError::HabitNotFound(3).is_not_found());
        assert!(CoreError::CategoryNotFound("Gym".into()).is_not_found());
        assert!(!CoreError::HabitNotFound(3).is_internal());
        assert!(!CoreError::Consistency("x".into()).is_not_found());
    }

    #[test]
    fn missing_streak_counts_as_internal() {
        assert!(CoreError::StreakNotFound(9).is_internal());
        assert!(CoreError::ReconcileIncomplete { failed: vec![1] }.is_internal());
    }

    #[test]
    fn unique_violation_maps_to_duplicate() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (k INTEGER NOT NULL UNIQUE); INSERT INTO t VALUES (1);")
            .unwrap();
        let err = conn.execute("INSERT INTO t VALUES (1)", []).unwrap_err();
        assert!(matches!(DatabaseError::from(err), DatabaseError::Duplicate(_)));
    }

    #[test]
    fn validation_message_names_the_field() {
        let err = ValidationError::invalid("name", "must not be blank");
        assert_eq!(err.to_string(), "Invalid value for 'name': must not be blank");
    }
}
