//! CLI integration tests for `drover up`, `drover status` and `drover dbversion`
//!
//! Each test builds a throwaway project directory (dbconf.yml plus a
//! migrations folder) backed by a DuckDB file and runs the real binary
//! against it.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Path to the compiled drover binary (resolved at compile time)
fn drover_bin() -> String {
    env!("CARGO_BIN_EXE_drover").to_string()
}

const USERS: &str = "-- +migrate Up
CREATE TABLE users (id INTEGER, name VARCHAR);

-- +migrate Down
DROP TABLE users;
";

const BROKEN: &str = "-- +migrate Up
INSERT INTO table_that_does_not_exist VALUES (1);
";

const ORDERS: &str = "-- +migrate Up
CREATE TABLE orders (id INTEGER, user_id INTEGER);
-- +migrate Down
DROP TABLE orders;
";

/// Create a project with the given migration files.
fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("dbconf.yml"),
        "development:\n  driver: duckdb\n  open: app.duckdb\n",
    )
    .unwrap();
    let migrations = dir.path().join("migrations");
    fs::create_dir(&migrations).unwrap();
    for (name, body) in files {
        fs::write(migrations.join(name), body).unwrap();
    }
    dir
}

fn drover(dir: &Path, args: &[&str]) -> Output {
    Command::new(drover_bin())
        .args(args)
        .arg("--path")
        .arg(dir)
        .env_remove("DROVER_STRICT")
        .env_remove("DROVER_ENV")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run drover")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn combined(output: &Output) -> String {
    format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

// ── drover up ───────────────────────────────────────────────────────────

#[test]
fn test_up_applies_pending_migrations_in_order() {
    let dir = project(&[("00002_orders.sql", ORDERS), ("00001_users.sql", USERS)]);

    let output = drover(dir.path(), &["up"]);
    assert!(output.status.success(), "{}", combined(&output));

    let out = stdout(&output);
    let users = out.find("OK    00001_users.sql").expect("users applied");
    let orders = out.find("OK    00002_orders.sql").expect("orders applied");
    assert!(users < orders, "migrations out of order:\n{out}");
}

#[test]
fn test_up_second_run_is_idempotent() {
    let dir = project(&[("00001_users.sql", USERS), ("00002_orders.sql", ORDERS)]);

    let first = drover(dir.path(), &["up"]);
    assert!(first.status.success(), "{}", combined(&first));

    let second = drover(dir.path(), &["up"]);
    assert!(second.status.success(), "{}", combined(&second));
    let out = stdout(&second);
    assert!(!out.contains("OK "), "nothing should re-run:\n{out}");
    assert!(
        out.contains("no migrations to run. current version: 2"),
        "{out}"
    );
}

#[test]
fn test_up_lenient_continues_past_failure() {
    let dir = project(&[
        ("00001_users.sql", USERS),
        ("00002_broken.sql", BROKEN),
        ("00003_orders.sql", ORDERS),
    ]);

    let output = drover(dir.path(), &["up"]);
    assert!(
        output.status.success(),
        "lenient run should exit 0\n{}",
        combined(&output)
    );
    let out = stdout(&output);
    assert!(out.contains("OK    00001_users.sql"), "{out}");
    assert!(out.contains("FAIL  00002_broken.sql"), "{out}");
    assert!(out.contains("OK    00003_orders.sql"), "{out}");
}

#[test]
fn test_up_strict_stops_at_first_failure() {
    let dir = project(&[
        ("00001_users.sql", USERS),
        ("00002_broken.sql", BROKEN),
        ("00003_orders.sql", ORDERS),
    ]);

    let output = drover(dir.path(), &["up", "--strict"]);
    assert!(
        !output.status.success(),
        "strict run should fail\n{}",
        combined(&output)
    );
    let out = stdout(&output);
    assert!(out.contains("OK    00001_users.sql"), "{out}");
    assert!(out.contains("FAIL  00002_broken.sql"), "{out}");
    assert!(!out.contains("00003_orders.sql"), "v3 must not be attempted:\n{out}");
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("quitting migration"),
        "{}",
        combined(&output)
    );

    let version = drover(dir.path(), &["dbversion"]);
    assert!(stdout(&version).contains("drover: dbversion 1"), "{}", combined(&version));
}

#[test]
fn test_up_strict_from_environment_variable() {
    let dir = project(&[("00001_broken.sql", BROKEN)]);

    let output = Command::new(drover_bin())
        .args(["up", "--path"])
        .arg(dir.path())
        .env("DROVER_STRICT", "true")
        .output()
        .expect("Failed to run drover");
    assert!(!output.status.success(), "{}", combined(&output));
}

#[test]
fn test_up_rerun_retries_failed_migration() {
    let dir = project(&[("00001_users.sql", USERS), ("00002_broken.sql", BROKEN)]);

    let first = drover(dir.path(), &["up"]);
    assert!(first.status.success(), "{}", combined(&first));

    fs::write(dir.path().join("migrations/00002_broken.sql"), ORDERS).unwrap();
    let second = drover(dir.path(), &["up"]);
    assert!(second.status.success(), "{}", combined(&second));
    let out = stdout(&second);
    assert!(!out.contains("00001_users.sql"), "{out}");
    assert!(out.contains("OK    00002_broken.sql"), "{out}");
}

#[test]
fn test_up_json_output() {
    let dir = project(&[("00001_users.sql", USERS), ("00002_broken.sql", BROKEN)]);

    let output = drover(dir.path(), &["up", "--output", "json"]);
    assert!(output.status.success(), "{}", combined(&output));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["environment"], "development");
    assert_eq!(report["status"], "completed");
    let migrations = report["migrations"].as_array().unwrap();
    assert_eq!(migrations.len(), 2);
    assert_eq!(migrations[0]["version"], 1);
    assert_eq!(migrations[0]["status"], "applied");
    assert_eq!(migrations[0]["kind"], "scripted");
    assert_eq!(migrations[1]["status"], "failed");
    assert!(migrations[1]["error"].is_string());
}

#[test]
fn test_up_unknown_extension_is_a_configuration_error() {
    let dir = project(&[("00001_users.sql", USERS), ("00002_seed.py", "print()")]);

    let output = drover(dir.path(), &["up"]);
    assert!(!output.status.success(), "{}", combined(&output));
    assert!(
        !stdout(&output).contains("OK "),
        "nothing should run before the error\n{}",
        combined(&output)
    );
}

#[test]
fn test_up_missing_environment_fails() {
    let dir = project(&[("00001_users.sql", USERS)]);

    let output = drover(dir.path(), &["up", "--env", "production"]);
    assert!(!output.status.success(), "{}", combined(&output));
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("production"),
        "{}",
        combined(&output)
    );
}

#[test]
fn test_up_with_schema_override() {
    let dir = project(&[("00001_users.sql", USERS)]);

    let output = drover(dir.path(), &["up", "--schema", "app"]);
    assert!(output.status.success(), "{}", combined(&output));

    // The default schema keeps its own, empty, ledger.
    let version = drover(dir.path(), &["dbversion"]);
    assert!(stdout(&version).contains("drover: dbversion 0"), "{}", combined(&version));

    let version = drover(dir.path(), &["dbversion", "--schema", "app"]);
    assert!(stdout(&version).contains("drover: dbversion 1"), "{}", combined(&version));
}

// ── drover status / dbversion ───────────────────────────────────────────

#[test]
fn test_status_lists_applied_and_pending() {
    let dir = project(&[("00001_users.sql", USERS), ("00002_broken.sql", BROKEN)]);
    let up = drover(dir.path(), &["up"]);
    assert!(up.status.success(), "{}", combined(&up));

    let output = drover(dir.path(), &["status"]);
    assert!(output.status.success(), "{}", combined(&output));
    let out = stdout(&output);
    let users = out
        .lines()
        .find(|l| l.contains("00001_users.sql"))
        .expect("users listed");
    let broken = out
        .lines()
        .find(|l| l.contains("00002_broken.sql"))
        .expect("broken listed");
    assert!(!users.contains("Pending"), "{out}");
    assert!(broken.contains("Pending"), "{out}");
}

#[test]
fn test_dbversion_fresh_database_is_zero() {
    let dir = project(&[]);

    let output = drover(dir.path(), &["dbversion"]);
    assert!(output.status.success(), "{}", combined(&output));
    assert!(stdout(&output).contains("drover: dbversion 0"), "{}", combined(&output));
}
