//! Completion statistics over the ledger.

mod completion;

pub use completion::{completed_counts, HistoryRange};
