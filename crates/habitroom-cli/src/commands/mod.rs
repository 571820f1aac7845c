pub mod category;
pub mod config;
pub mod habit;
pub mod history;

use habitroom_core::{Config, HabitDb, HabitTracker, UserId};
use serde::Serialize;

/// Settings shared by every command.
pub struct Context {
    pub config: Config,
    pub user_id: UserId,
}

impl Context {
    /// Open the configured database behind a system-clock tracker.
    pub fn tracker(&self) -> habitroom_core::Result<HabitTracker<HabitDb>> {
        let db = HabitDb::open(&self.config)?;
        Ok(HabitTracker::new(db).with_heatmap_window(self.config.tracker.heatmap_window_days))
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
