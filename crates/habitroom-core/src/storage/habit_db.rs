//! SQLite-backed habit, streak, category and ledger storage.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::migrations;
use super::traits::{CategoryStore, HabitStore, HistoryStore, StreakStore, Transactional};
use super::Config;
use crate::calendar::WeekdaySet;
use crate::error::{CoreError, DatabaseError, Result};
use crate::habit::{
    Category, Habit, HabitDraft, HabitId, HabitStatus, HistoryEntry, NewHistoryEntry, StreakState,
    UserId,
};

const DAY_FORMAT: &str = "%Y-%m-%d";

const HABIT_COLUMNS: &str = "h.id, h.user_id, h.name, h.description, c.id, c.name, h.frequency,
     h.active_days, h.enabled, h.created_at, h.created_on
     FROM habits h JOIN categories c ON c.id = h.category_id";

// === Helper Functions ===

fn conversion_error<E>(idx: usize, ty: Type, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, ty, Box::new(err))
}

fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

fn parse_day(idx: usize, s: &str) -> Result<NaiveDate, rusqlite::Error> {
    NaiveDate::parse_from_str(s, DAY_FORMAT).map_err(|e| conversion_error(idx, Type::Text, e))
}

fn parse_status(idx: usize, s: &str) -> Result<HabitStatus, rusqlite::Error> {
    s.parse::<HabitStatus>()
        .map_err(|e| conversion_error(idx, Type::Text, e))
}

fn row_to_habit(row: &Row) -> Result<Habit, rusqlite::Error> {
    let bits: i64 = row.get(7)?;
    let active_days = u8::try_from(bits)
        .map_err(|e| conversion_error(7, Type::Integer, e))
        .and_then(|b| WeekdaySet::from_bits(b).map_err(|e| conversion_error(7, Type::Integer, e)))?;

    let created_at_str: String = row.get(9)?;
    let created_at = DateTime::parse_from_rfc3339(&created_at_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(9, Type::Text, e))?;

    let created_on_str: String = row.get(10)?;

    Ok(Habit {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        category: Category {
            id: row.get(4)?,
            name: row.get(5)?,
        },
        frequency: row.get(6)?,
        active_days,
        enabled: row.get(8)?,
        created_at,
        created_on: parse_day(10, &created_on_str)?,
    })
}

fn row_to_entry(row: &Row) -> Result<HistoryEntry, rusqlite::Error> {
    let day: String = row.get(2)?;
    let status: String = row.get(3)?;
    Ok(HistoryEntry {
        id: row.get(0)?,
        habit_id: row.get(1)?,
        day: parse_day(2, &day)?,
        status: parse_status(3, &status)?,
    })
}

/// SQLite database for habits and their ledger.
///
/// One connection per instance. Several instances may share a database file;
/// writers serialize on SQLite's database lock.
pub struct HabitDb {
    conn: Connection,
}

impl HabitDb {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database configured in `config`, seeding default categories.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(config: &Config) -> Result<Self> {
        let db = Self::open_path(config.database_path()?, config.database.busy_timeout_ms)?;
        let seeded = db.seed_categories(&config.categories.defaults)?;
        if seeded > 0 {
            tracing::info!(seeded, "seeded default categories");
        }
        Ok(db)
    }

    /// Open (creating if needed) a database file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened or migrated.
    pub fn open_path(path: impl AsRef<Path>, busy_timeout_ms: u64) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(Duration::from_millis(busy_timeout_ms))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    ///
    /// # Errors
    /// Returns an error if migration fails.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        migrations::migrate(&self.conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(())
    }

    /// Insert categories that are not present yet (names compare case-insensitively).
    pub fn seed_categories<S: AsRef<str>>(&self, names: &[S]) -> Result<usize> {
        let mut stmt = self
            .conn
            .prepare_cached("INSERT OR IGNORE INTO categories (name) VALUES (?1)")?;
        let mut inserted = 0;
        for name in names {
            let name = name.as_ref().trim();
            if !name.is_empty() {
                inserted += stmt.execute(params![name])?;
            }
        }
        Ok(inserted)
    }
}

impl Transactional for HabitDb {
    fn transaction<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Self) -> Result<T>,
    {
        // Already inside an outer unit; let it decide.
        if !self.conn.is_autocommit() {
            return f(self);
        }

        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        match f(self) {
            Ok(value) => match self.conn.execute_batch("COMMIT;") {
                Ok(()) => Ok(value),
                Err(err) => {
                    let _ = self.conn.execute_batch("ROLLBACK;");
                    Err(err.into())
                }
            },
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err)
            }
        }
    }
}

impl HabitStore for HabitDb {
    fn get_habit(&self, id: HabitId) -> Result<Option<Habit>> {
        let sql = format!("SELECT {HABIT_COLUMNS} WHERE h.id = ?1");
        Ok(self
            .conn
            .query_row(&sql, params![id], row_to_habit)
            .optional()?)
    }

    fn get_habit_for_user(&self, user_id: UserId, id: HabitId) -> Result<Option<Habit>> {
        let sql = format!("SELECT {HABIT_COLUMNS} WHERE h.id = ?1 AND h.user_id = ?2");
        Ok(self
            .conn
            .query_row(&sql, params![id, user_id], row_to_habit)
            .optional()?)
    }

    fn get_enabled_for_user(&self, user_id: UserId, id: HabitId) -> Result<Option<Habit>> {
        let sql =
            format!("SELECT {HABIT_COLUMNS} WHERE h.id = ?1 AND h.user_id = ?2 AND h.enabled = 1");
        Ok(self
            .conn
            .query_row(&sql, params![id, user_id], row_to_habit)
            .optional()?)
    }

    fn list_enabled_for_user(&self, user_id: UserId) -> Result<Vec<Habit>> {
        let sql = format!(
            "SELECT {HABIT_COLUMNS} WHERE h.user_id = ?1 AND h.enabled = 1 ORDER BY h.id"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let habits = stmt
            .query_map(params![user_id], row_to_habit)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(habits)
    }

    fn insert_habit(
        &self,
        user_id: UserId,
        draft: &HabitDraft,
        category: &Category,
        created_at: DateTime<Utc>,
        created_on: NaiveDate,
    ) -> Result<Habit> {
        self.conn.execute(
            "INSERT INTO habits (user_id, name, description, category_id, frequency,
                                 active_days, enabled, created_at, created_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?8)",
            params![
                user_id,
                draft.name,
                draft.description,
                category.id,
                draft.frequency,
                draft.active_days.bits(),
                created_at.to_rfc3339(),
                format_day(created_on),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        self.get_habit(id)?
            .ok_or_else(|| CoreError::Consistency(format!("habit {id} vanished after insert")))
    }

    fn disable_habit(&self, user_id: UserId, id: HabitId) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE habits SET enabled = 0 WHERE id = ?1 AND user_id = ?2 AND enabled = 1",
            params![id, user_id],
        )?;
        Ok(changed > 0)
    }
}

impl CategoryStore for HabitDb {
    fn find_category_by_name(&self, name: &str) -> Result<Option<Category>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name FROM categories WHERE name = ?1",
                params![name.trim()],
                |row| {
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()?)
    }

    fn list_categories(&self) -> Result<Vec<Category>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM categories ORDER BY id")?;
        let categories = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}

impl StreakStore for HabitDb {
    fn get_streak(&self, habit_id: HabitId) -> Result<Option<StreakState>> {
        Ok(self
            .conn
            .query_row(
                "SELECT habit_id, current_streak, longest_streak, last_completed_date
                 FROM habit_streaks WHERE habit_id = ?1",
                params![habit_id],
                |row| {
                    let last: Option<String> = row.get(3)?;
                    Ok(StreakState {
                        habit_id: row.get(0)?,
                        current_streak: row.get(1)?,
                        longest_streak: row.get(2)?,
                        last_completed_date: last.as_deref().map(|s| parse_day(3, s)).transpose()?,
                    })
                },
            )
            .optional()?)
    }

    fn save_streak(&self, streak: &StreakState) -> Result<()> {
        self.conn.execute(
            "INSERT INTO habit_streaks (habit_id, current_streak, longest_streak, last_completed_date)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(habit_id) DO UPDATE SET
                 current_streak = excluded.current_streak,
                 longest_streak = excluded.longest_streak,
                 last_completed_date = excluded.last_completed_date",
            params![
                streak.habit_id,
                streak.current_streak,
                streak.longest_streak,
                streak.last_completed_date.map(format_day),
            ],
        )?;
        Ok(())
    }
}

impl HistoryStore for HabitDb {
    fn find_entry(&self, habit_id: HabitId, day: NaiveDate) -> Result<Option<HistoryEntry>> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, habit_id, day, status FROM habit_history
                 WHERE habit_id = ?1 AND day = ?2",
                params![habit_id, format_day(day)],
                row_to_entry,
            )
            .optional()?)
    }

    fn last_day_for_habit(&self, habit_id: HabitId) -> Result<Option<NaiveDate>> {
        let last: Option<String> = self.conn.query_row(
            "SELECT MAX(day) FROM habit_history WHERE habit_id = ?1",
            params![habit_id],
            |row| row.get(0),
        )?;
        Ok(last.as_deref().map(|s| parse_day(0, s)).transpose()?)
    }

    fn insert_batch(&self, entries: &[NewHistoryEntry]) -> Result<usize> {
        if entries.is_empty() {
            return Ok(0);
        }
        self.transaction(|db| {
            let mut stmt = db.conn.prepare_cached(
                "INSERT INTO habit_history (habit_id, day, status) VALUES (?1, ?2, ?3)
                 ON CONFLICT(habit_id, day) DO NOTHING",
            )?;
            let mut inserted = 0;
            for entry in entries {
                inserted += stmt.execute(params![
                    entry.habit_id,
                    format_day(entry.day),
                    entry.status.as_str(),
                ])?;
            }
            Ok(inserted)
        })
    }

    fn save_entry(&self, entry: &HistoryEntry) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE habit_history SET status = ?1 WHERE id = ?2",
            params![entry.status.as_str(), entry.id],
        )?;
        if changed == 0 {
            return Err(CoreError::HistoryNotFound {
                habit_id: entry.habit_id,
                day: entry.day,
            });
        }
        Ok(())
    }

    fn list_for_habit(&self, habit_id: HabitId) -> Result<Vec<HistoryEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, day, status FROM habit_history
             WHERE habit_id = ?1 ORDER BY day",
        )?;
        let entries = stmt
            .query_map(params![habit_id], row_to_entry)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    fn completed_counts_between(
        &self,
        user_id: UserId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<BTreeMap<NaiveDate, u64>> {
        let mut stmt = self.conn.prepare(
            "SELECT hh.day, COUNT(*)
             FROM habit_history hh JOIN habits h ON h.id = hh.habit_id
             WHERE h.user_id = ?1 AND hh.status = 'COMPLETED' AND hh.day BETWEEN ?2 AND ?3
             GROUP BY hh.day
             ORDER BY hh.day",
        )?;
        let rows = stmt.query_map(params![user_id, format_day(from), format_day(to)], |row| {
            let day: String = row.get(0)?;
            Ok((parse_day(0, &day)?, row.get::<_, u64>(1)?))
        })?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (day, count) = row?;
            counts.insert(day, count);
        }
        Ok(counts)
    }
}
