mod config;
pub mod habit_db;
pub mod migrations;
pub mod traits;

pub use config::{CategoriesConfig, Config, DatabaseConfig, LoggingConfig, TrackerConfig};
pub use habit_db::HabitDb;
pub use traits::{CategoryStore, HabitStore, HistoryStore, LedgerStore, StreakStore, Transactional};

use std::path::PathBuf;

/// Returns `~/.config/habitroom[-dev]/` based on HABITROOM_ENV.
///
/// Set HABITROOM_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("HABITROOM_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("habitroom-dev")
    } else {
        base_dir.join("habitroom")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
