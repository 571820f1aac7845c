//! Database schema migrations for habitroom.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: categories, habits, streaks and the daily ledger.
///
/// `(habit_id, day)` is unique in `habit_history`; reconciliation relies on
/// it to make concurrent backfills harmless.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS categories (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            name  TEXT NOT NULL UNIQUE COLLATE NOCASE
        );

        CREATE TABLE IF NOT EXISTS habits (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id      INTEGER NOT NULL,
            name         TEXT NOT NULL,
            description  TEXT,
            category_id  INTEGER NOT NULL REFERENCES categories(id),
            frequency    TEXT NOT NULL,
            active_days  INTEGER NOT NULL CHECK (active_days BETWEEN 1 AND 127),
            enabled      INTEGER NOT NULL DEFAULT 1,
            created_at   TEXT NOT NULL,
            created_on   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS habit_streaks (
            habit_id             INTEGER PRIMARY KEY REFERENCES habits(id),
            current_streak       INTEGER NOT NULL DEFAULT 0 CHECK (current_streak >= 0),
            longest_streak       INTEGER NOT NULL DEFAULT 0,
            last_completed_date  TEXT,
            CHECK (longest_streak >= current_streak)
        );

        CREATE TABLE IF NOT EXISTS habit_history (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            habit_id  INTEGER NOT NULL REFERENCES habits(id),
            day       TEXT NOT NULL,
            status    TEXT NOT NULL CHECK (status IN ('PENDING', 'COMPLETED', 'MISSED'))
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_history_habit_day ON habit_history(habit_id, day);
        CREATE INDEX IF NOT EXISTS idx_habits_user_enabled ON habits(user_id, enabled);",
    )?;
    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: index for per-day completion counts.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(
        "CREATE INDEX IF NOT EXISTS idx_history_status_day ON habit_history(status, day);",
    )?;
    set_schema_version(&tx, 2)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_database_reaches_current_version() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), CURRENT_SCHEMA_VERSION);
    }

    #[test]
    fn migrate_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |r| r.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn history_rejects_duplicate_day() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        conn.execute_batch(
            "INSERT INTO categories (name) VALUES ('Health');
             INSERT INTO habits (user_id, name, category_id, frequency, active_days, created_at, created_on)
                 VALUES (1, 'Walk', 1, 'DAILY', 127, '2026-10-19T08:00:00+00:00', '2026-10-19');
             INSERT INTO habit_history (habit_id, day, status) VALUES (1, '2026-10-19', 'PENDING');",
        )
        .unwrap();
        let dup = conn.execute(
            "INSERT INTO habit_history (habit_id, day, status) VALUES (1, '2026-10-19', 'MISSED')",
            [],
        );
        assert!(dup.is_err());
    }
}
