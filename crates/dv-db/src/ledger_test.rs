//! Tests for the DuckDB version ledger: bootstrap, lookups, and tie-breaks.

use super::*;

fn exec(db: &Database, sql: &str) {
    db.conn().execute_batch(sql).unwrap();
}

fn count(db: &Database, sql: &str) -> i64 {
    db.conn()
        .query_row(sql, [], |row| row.get::<_, i64>(0))
        .unwrap()
}

#[test]
fn ensure_seeds_version_zero() {
    let db = Database::open_memory().unwrap();
    let ledger = DuckDbLedger::new(&db);
    ledger.ensure_version_table().unwrap();

    assert_eq!(count(&db, "SELECT COUNT(*) FROM drover_db_version"), 1);
    assert_eq!(ledger.current_version().unwrap(), 0);
    let entry = ledger.latest_entry(0).unwrap().unwrap();
    assert!(entry.is_applied);
}

#[test]
fn ensure_is_idempotent() {
    let db = Database::open_memory().unwrap();
    let ledger = DuckDbLedger::new(&db);
    ledger.ensure_version_table().unwrap();
    ledger.ensure_version_table().unwrap();

    assert_eq!(count(&db, "SELECT COUNT(*) FROM drover_db_version"), 1);
}

#[test]
fn ensure_in_schema() {
    let db = Database::open_memory().unwrap().with_schema("app").unwrap();
    let ledger = DuckDbLedger::new(&db);
    ledger.ensure_version_table().unwrap();
    ledger.record(4, true).unwrap();

    assert_eq!(count(&db, "SELECT COUNT(*) FROM app.drover_db_version"), 2);
    assert_eq!(ledger.current_version().unwrap(), 4);
}

#[test]
fn absent_version_is_none() {
    let db = Database::open_memory().unwrap();
    let ledger = DuckDbLedger::new(&db);
    ledger.ensure_version_table().unwrap();

    assert_eq!(ledger.latest_entry(42).unwrap(), None);
}

#[test]
fn recorded_version_is_applied() {
    let db = Database::open_memory().unwrap();
    let ledger = DuckDbLedger::new(&db);
    ledger.ensure_version_table().unwrap();
    ledger.record(7, true).unwrap();

    let entry = ledger.latest_entry(7).unwrap().unwrap();
    assert_eq!(entry.version, 7);
    assert!(entry.is_applied);
}

#[test]
fn latest_timestamp_wins() {
    let db = Database::open_memory().unwrap();
    let ledger = DuckDbLedger::new(&db);
    ledger.ensure_version_table().unwrap();
    exec(
        &db,
        "INSERT INTO drover_db_version (version_id, is_applied, tstamp) VALUES
             (7, true,  TIMESTAMP '2024-01-01 10:00:00'),
             (7, false, TIMESTAMP '2024-01-02 10:00:00');",
    );

    for _ in 0..3 {
        let entry = ledger.latest_entry(7).unwrap().unwrap();
        assert!(!entry.is_applied, "T2 rollback must win over T1 apply");
        assert_eq!(entry.applied_at.to_string(), "2024-01-02 10:00:00");
    }
}

#[test]
fn out_of_order_inserts_still_use_timestamp() {
    let db = Database::open_memory().unwrap();
    let ledger = DuckDbLedger::new(&db);
    ledger.ensure_version_table().unwrap();
    exec(
        &db,
        "INSERT INTO drover_db_version (version_id, is_applied, tstamp) VALUES
             (7, true,  TIMESTAMP '2024-01-02 10:00:00'),
             (7, false, TIMESTAMP '2024-01-01 10:00:00');",
    );

    assert!(ledger.latest_entry(7).unwrap().unwrap().is_applied);
}

#[test]
fn equal_timestamps_break_on_insertion_order() {
    let db = Database::open_memory().unwrap();
    let ledger = DuckDbLedger::new(&db);
    ledger.ensure_version_table().unwrap();
    exec(
        &db,
        "INSERT INTO drover_db_version (version_id, is_applied, tstamp) VALUES
             (7, false, TIMESTAMP '2024-01-01 10:00:00');
         INSERT INTO drover_db_version (version_id, is_applied, tstamp) VALUES
             (7, true,  TIMESTAMP '2024-01-01 10:00:00');",
    );

    for _ in 0..3 {
        assert!(ledger.latest_entry(7).unwrap().unwrap().is_applied);
    }
}

#[test]
fn current_version_ignores_rolled_back() {
    let db = Database::open_memory().unwrap();
    let ledger = DuckDbLedger::new(&db);
    ledger.ensure_version_table().unwrap();
    exec(
        &db,
        "INSERT INTO drover_db_version (version_id, is_applied, tstamp) VALUES
             (1, true,  TIMESTAMP '2024-01-01 10:00:00'),
             (2, true,  TIMESTAMP '2024-01-01 11:00:00'),
             (2, false, TIMESTAMP '2024-01-01 12:00:00');",
    );

    assert_eq!(ledger.current_version().unwrap(), 1);
}

#[test]
fn missing_table_is_unavailable_not_absent() {
    let db = Database::open_memory().unwrap();
    let ledger = DuckDbLedger::new(&db);

    let err = ledger.latest_entry(1).unwrap_err();
    assert!(matches!(err, LedgerError::Unavailable(_)));
    assert!(err.to_string().contains("[L001]"));
}

#[test]
fn record_without_table_fails() {
    let db = Database::open_memory().unwrap();
    let ledger = DuckDbLedger::new(&db);

    assert!(matches!(
        ledger.record(1, true).unwrap_err(),
        DbError::LedgerError(_)
    ));
}
