//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own HOME so the config file
//! and database live in a throwaway directory.

use std::process::Command;

use serde_json::Value;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(home: &TempDir, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_habitroom"))
        .args(args)
        .env("HOME", home.path())
        .env_remove("HABITROOM_ENV")
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(home: &TempDir, args: &[&str]) -> Value {
    let (stdout, stderr, code) = run_cli(home, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

const ALL_DAYS: &str = "mon,tue,wed,thu,fri,sat,sun";

#[test]
fn test_category_list_has_defaults() {
    let home = TempDir::new().unwrap();
    let categories = run_json(&home, &["category", "list"]);
    let names: Vec<&str> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 8);
    assert!(names.contains(&"Health"));
}

#[test]
fn test_daily_habit_lifecycle() {
    let home = TempDir::new().unwrap();
    let created = run_json(
        &home,
        &[
            "habit", "create", "Stretch", "--category", "health", "--frequency", "daily",
            "--days", ALL_DAYS,
        ],
    );
    assert_eq!(created["status"], "PENDING");
    assert_eq!(created["frequency"], "DAILY");
    assert_eq!(created["category"], "Health");
    let id = created["id"].as_i64().unwrap().to_string();

    let today = run_json(&home, &["habit", "today"]);
    assert_eq!(today.as_array().unwrap().len(), 1);

    let done = run_json(&home, &["habit", "done", &id]);
    assert_eq!(done["status"], "COMPLETED");
    assert_eq!(done["current_streak"], 1);
    assert_eq!(done["longest_streak"], 1);

    let history = run_json(&home, &["habit", "history", &id]);
    assert_eq!(history.as_array().unwrap().len(), 1);
    assert_eq!(history[0]["status"], "COMPLETED");

    let counts = run_json(&home, &["history", "completed"]);
    assert_eq!(counts.as_object().unwrap().len(), 1);

    let report = run_json(&home, &["history", "reconcile"]);
    assert_eq!(report["rows_inserted"], 0);

    let missed = run_json(&home, &["habit", "status", &id, "missed"]);
    assert_eq!(missed["current_streak"], 0);
    assert_eq!(missed["longest_streak"], 1);
}

#[test]
fn test_daily_with_partial_week_is_rejected() {
    let home = TempDir::new().unwrap();
    let (_, stderr, code) = run_cli(
        &home,
        &[
            "habit", "create", "Run", "--category", "Fitness", "--frequency", "DAILY",
            "--days", "mon,wed,fri",
        ],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"), "stderr: {stderr}");

    let all = run_json(&home, &["habit", "list"]);
    assert!(all.as_array().unwrap().is_empty());
}

#[test]
fn test_disable_hides_habit() {
    let home = TempDir::new().unwrap();
    let created = run_json(
        &home,
        &[
            "habit", "create", "Read", "--category", "Learning", "--frequency", "weekly",
            "--days", ALL_DAYS, "--description", "Twenty pages",
        ],
    );
    let id = created["id"].as_i64().unwrap().to_string();

    run_json(&home, &["habit", "disable", &id]);
    assert!(run_json(&home, &["habit", "list"]).as_array().unwrap().is_empty());
    assert!(run_json(&home, &["habit", "today"]).as_array().unwrap().is_empty());

    let (_, stderr, code) = run_cli(&home, &["habit", "done", &id]);
    assert_eq!(code, 1);
    assert!(stderr.contains("not found"), "stderr: {stderr}");

    // Ledger of a disabled habit is still readable.
    assert_eq!(run_json(&home, &["habit", "history", &id]).as_array().unwrap().len(), 1);
}

#[test]
fn test_habits_are_scoped_per_user() {
    let home = TempDir::new().unwrap();
    run_json(
        &home,
        &[
            "--user", "7", "habit", "create", "Journal", "--category", "Mindfulness",
            "--frequency", "daily", "--days", ALL_DAYS,
        ],
    );
    assert_eq!(run_json(&home, &["--user", "7", "habit", "list"]).as_array().unwrap().len(), 1);
    assert!(run_json(&home, &["habit", "list"]).as_array().unwrap().is_empty());
}

#[test]
fn test_config_get_and_set() {
    let home = TempDir::new().unwrap();
    let (stdout, _, code) = run_cli(&home, &["config", "get", "tracker.heatmap_window_days"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "365");

    let (stdout, _, code) = run_cli(&home, &["config", "set", "tracker.heatmap_window_days", "30"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let config = run_json(&home, &["config", "list"]);
    assert_eq!(config["tracker"]["heatmap_window_days"], 30);

    let (_, stderr, code) = run_cli(&home, &["config", "get", "tracker.nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}
