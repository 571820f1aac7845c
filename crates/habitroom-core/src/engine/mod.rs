//! Ledger reconciliation and streak computation.
//!
//! Both engines are free functions over the store traits and take "today"
//! explicitly; [`HabitTracker`](crate::HabitTracker) supplies it from a clock.

pub mod reconcile;
pub mod streak;

pub use reconcile::{ensure_history_up_to, missing_entries, ReconcileReport};
pub use streak::update_today_status;
