//! # Habitroom Core Library
//!
//! Business logic for Habitroom, a weekday-scheduled habit tracker. Like the
//! CLI built on top of it, everything here is synchronous and driven by the
//! caller; there is no background scheduler.
//!
//! ## Architecture
//!
//! - **Calendar**: weekday sets and the "previous scheduled day" walk
//! - **Ledger**: one history row per habit and calendar day, backfilled
//!   lazily by the reconciliation engine whenever "today" is read
//! - **Streaks**: recomputed atomically with today's row on every status update
//! - **Storage**: store traits plus a SQLite implementation and TOML config
//!
//! ## Key Components
//!
//! - [`HabitTracker`]: caller-facing operations
//! - [`WeekdaySet`]: active-day schedule
//! - [`HabitDb`]: SQLite-backed stores
//! - [`Config`]: application configuration management

pub mod calendar;
pub mod clock;
pub mod engine;
pub mod error;
pub mod habit;
pub mod stats;
pub mod storage;
pub mod tracker;

pub use calendar::WeekdaySet;
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::ReconcileReport;
pub use error::{ConfigError, CoreError, DatabaseError, Result, ValidationError};
pub use habit::{
    Category, Habit, HabitId, HabitStatus, HabitView, HistoryEntry, NewHabit, StreakState, UserId,
};
pub use stats::HistoryRange;
pub use storage::{Config, HabitDb, LedgerStore};
pub use tracker::HabitTracker;
