use clap::Subcommand;
use habitroom_core::{HabitDb, HabitId, HabitStatus, HabitTracker, NewHabit, UserId};

use super::{print_json, Context};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Create a habit
    Create {
        /// Habit name
        name: String,
        /// Category name (see `category list`)
        #[arg(long)]
        category: String,
        /// Frequency label; DAILY requires all seven days
        #[arg(long)]
        frequency: String,
        /// Active weekdays, e.g. mon,wed,fri
        #[arg(long, value_delimiter = ',', required = true)]
        days: Vec<String>,
        /// Optional description
        #[arg(long)]
        description: Option<String>,
    },
    /// List all enabled habits
    List,
    /// Habits scheduled today with today's status
    Today,
    /// Mark today's entry completed
    Done {
        /// Habit ID
        id: HabitId,
    },
    /// Mark today's entry missed
    Miss {
        /// Habit ID
        id: HabitId,
    },
    /// Set today's status explicitly
    Status {
        /// Habit ID
        id: HabitId,
        /// pending, completed or missed
        status: HabitStatus,
    },
    /// Disable a habit (its history is kept)
    Disable {
        /// Habit ID
        id: HabitId,
    },
    /// Show a habit's daily ledger
    History {
        /// Habit ID
        id: HabitId,
    },
}

pub fn run(ctx: &Context, action: HabitAction) -> Result<(), Box<dyn std::error::Error>> {
    let tracker = ctx.tracker()?;
    let user = ctx.user_id;

    match action {
        HabitAction::Create {
            name,
            category,
            frequency,
            days,
            description,
        } => {
            let request = NewHabit {
                name,
                description,
                category,
                frequency,
                days,
            };
            let view = tracker.create_habit(user, &request)?;
            print_json(&view)?;
        }
        HabitAction::List => {
            print_json(&tracker.list_all(user)?)?;
        }
        HabitAction::Today => {
            print_json(&tracker.list_today(user)?)?;
        }
        HabitAction::Done { id } => set_status(&tracker, user, id, HabitStatus::Completed)?,
        HabitAction::Miss { id } => set_status(&tracker, user, id, HabitStatus::Missed)?,
        HabitAction::Status { id, status } => set_status(&tracker, user, id, status)?,
        HabitAction::Disable { id } => {
            tracker.disable_habit(user, id)?;
            print_json(&serde_json::json!({ "id": id, "enabled": false }))?;
        }
        HabitAction::History { id } => {
            print_json(&tracker.history(user, id)?)?;
        }
    }
    Ok(())
}

// Today's row may not exist yet on the first command of the day.
fn set_status(
    tracker: &HabitTracker<HabitDb>,
    user: UserId,
    id: HabitId,
    status: HabitStatus,
) -> Result<(), Box<dyn std::error::Error>> {
    tracker.reconcile(user)?;
    let view = tracker.update_status(user, id, status)?;
    print_json(&view)
}
