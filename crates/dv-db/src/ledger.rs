//! DuckDB-backed version ledger.
//!
//! History lives in an append-only `drover_db_version` table:
//!
//! | column       | type      |                                         |
//! |--------------|-----------|-----------------------------------------|
//! | `id`         | BIGINT    | insertion sequence, breaks tstamp ties  |
//! | `version_id` | BIGINT    | migration version                       |
//! | `is_applied` | BOOLEAN   | `false` records a rollback              |
//! | `tstamp`     | TIMESTAMP | write time                              |

use crate::database::Database;
use crate::error::{DbError, DbResult};
use chrono::DateTime;
use duckdb::OptionalExt;
use dv_core::sql_utils::{qualify, quote_ident, quote_literal};
use dv_core::{LedgerEntry, LedgerError, VersionLedger};

/// Ledger table name.
pub const LEDGER_TABLE: &str = "drover_db_version";

const LEDGER_SEQUENCE: &str = "drover_db_version_id_seq";

/// Version ledger stored in the migrated database itself.
pub struct DuckDbLedger<'a> {
    db: &'a Database,
    table: String,
    sequence: String,
}

impl<'a> DuckDbLedger<'a> {
    /// Ledger in the database's schema (or the default schema).
    pub fn new(db: &'a Database) -> Self {
        let schema = db.schema();
        let sequence = match schema {
            Some(s) => format!("{s}.{LEDGER_SEQUENCE}"),
            None => LEDGER_SEQUENCE.to_string(),
        };
        Self {
            db,
            table: qualify(schema, LEDGER_TABLE),
            sequence,
        }
    }

    /// Create the ledger table if it does not exist.
    ///
    /// A pristine table is seeded with an applied version-0 row so that a
    /// fresh database reports version 0.
    pub fn ensure_version_table(&self) -> DbResult<()> {
        let conn = self.db.conn();
        if let Some(schema) = self.db.schema() {
            conn.execute_batch(&format!(
                "CREATE SCHEMA IF NOT EXISTS {}",
                quote_ident(schema)
            ))
            .map_err(|e| DbError::LedgerError(format!("failed to create schema: {e}")))?;
        }
        conn.execute_batch(&format!(
            "CREATE SEQUENCE IF NOT EXISTS {seq_ident};
             CREATE TABLE IF NOT EXISTS {table} (
                 id         BIGINT PRIMARY KEY DEFAULT nextval({seq_literal}),
                 version_id BIGINT NOT NULL,
                 is_applied BOOLEAN NOT NULL,
                 tstamp     TIMESTAMP NOT NULL DEFAULT current_timestamp
             );",
            seq_ident = qualify(self.db.schema(), LEDGER_SEQUENCE),
            table = self.table,
            seq_literal = quote_literal(&self.sequence),
        ))
        .map_err(|e| DbError::LedgerError(format!("failed to create {}: {e}", self.table)))?;

        let rows: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", self.table), [], |row| {
                row.get(0)
            })
            .map_err(|e| DbError::LedgerError(format!("failed to read {}: {e}", self.table)))?;
        if rows == 0 {
            log::debug!("Seeding {} with version 0", self.table);
            self.record(0, true)?;
        }
        Ok(())
    }

    /// Append a ledger row for `version`.
    pub fn record(&self, version: i64, is_applied: bool) -> DbResult<()> {
        self.db
            .conn()
            .execute(
                &format!(
                    "INSERT INTO {} (version_id, is_applied) VALUES (?, ?)",
                    self.table
                ),
                duckdb::params![version, is_applied],
            )
            .map_err(|e| DbError::LedgerError(format!("failed to record version {version}: {e}")))?;
        Ok(())
    }

    /// Highest version whose most recent entry is applied, or 0.
    pub fn current_version(&self) -> DbResult<i64> {
        let version: i64 = self
            .db
            .conn()
            .query_row(
                &format!(
                    "SELECT COALESCE(MAX(version_id), 0) FROM (
                         SELECT version_id, is_applied,
                                row_number() OVER (
                                    PARTITION BY version_id ORDER BY tstamp DESC, id DESC
                                ) AS rn
                         FROM {}
                     ) WHERE rn = 1 AND is_applied",
                    self.table
                ),
                [],
                |row| row.get(0),
            )
            .map_err(|e| DbError::LedgerError(format!("failed to read current version: {e}")))?;
        Ok(version)
    }
}

impl VersionLedger for DuckDbLedger<'_> {
    fn latest_entry(&self, version: i64) -> Result<Option<LedgerEntry>, LedgerError> {
        let row: Option<(i64, i64, bool)> = self
            .db
            .conn()
            .query_row(
                &format!(
                    "SELECT version_id, epoch_us(tstamp), is_applied FROM {}
                     WHERE version_id = ?
                     ORDER BY tstamp DESC, id DESC
                     LIMIT 1",
                    self.table
                ),
                duckdb::params![version],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()
            .map_err(|e| LedgerError::Unavailable(e.to_string()))?;

        let Some((version, micros, is_applied)) = row else {
            return Ok(None);
        };
        let applied_at = DateTime::from_timestamp_micros(micros)
            .map(|dt| dt.naive_utc())
            .ok_or_else(|| {
                LedgerError::Unavailable(format!("invalid timestamp for version {version}"))
            })?;

        Ok(Some(LedgerEntry {
            version,
            applied_at,
            is_applied,
        }))
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;
