use clap::Subcommand;
use habitroom_core::HistoryRange;

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum HistoryAction {
    /// Backfill missed days and today's pending rows
    Reconcile,
    /// Completed entries per day
    Completed {
        /// "current" (trailing window) or a calendar year
        #[arg(long, default_value = "current")]
        year: HistoryRange,
    },
}

pub fn run(ctx: &Context, action: HistoryAction) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = ctx.tracker()?;

    match action {
        HistoryAction::Reconcile => {
            let report = tracker.reconcile(ctx.user_id)?;
            print_json(&report)?;
        }
        HistoryAction::Completed { year } => {
            let counts = tracker.completed_counts(ctx.user_id, year)?.unwrap_or_default();
            print_json(&counts)?;
        }
    }
    Ok(())
}
