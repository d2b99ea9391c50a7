//! DuckDB connection wrapper.
//!
//! [`Database`] owns the connection for a whole migration run. Dropping it
//! closes the connection, so every exit path releases the handle.

use crate::error::{DbError, DbResult};
use duckdb::Connection;
use dv_core::sql_utils::{quote_ident, quote_literal};
use dv_core::DbConf;
use std::path::Path;

/// Wrapper around the DuckDB connection migrations run against.
///
/// Single-threaded: migrations are applied one at a time.
pub struct Database {
    conn: Connection,
    schema: Option<String>,
}

impl Database {
    /// Open (or create) the database file at `path`.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn, schema: None })
    }

    /// Open an in-memory database.
    pub fn open_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn, schema: None })
    }

    /// Open the database described by `conf`, switching to its schema if set.
    pub fn connect(conf: &DbConf) -> DbResult<Self> {
        let db = match conf.database_path() {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    if !parent.as_os_str().is_empty() && !parent.exists() {
                        return Err(DbError::ConnectionError(format!(
                            "directory does not exist: {}",
                            parent.display()
                        )));
                    }
                }
                Self::open(&path)?
            }
            None => Self::open_memory()?,
        };
        log::debug!("Connected to {} database '{}'", conf.driver, conf.open);

        match conf.schema.as_deref() {
            Some(schema) => db.with_schema(schema),
            None => Ok(db),
        }
    }

    /// Create `schema` if needed and make it the default for unqualified names.
    pub fn with_schema(mut self, schema: &str) -> DbResult<Self> {
        self.conn
            .execute_batch(&format!(
                "CREATE SCHEMA IF NOT EXISTS {}; SET schema = {};",
                quote_ident(schema),
                quote_literal(schema)
            ))
            .map_err(|e| DbError::ConnectionError(format!("failed to use schema {schema}: {e}")))?;
        self.schema = Some(schema.to_string());
        Ok(self)
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Schema qualifier in effect, if any.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    pub fn transaction<F, T>(&self, body: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(DbError::TransactionError(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(_) => {
                let _ = self.conn.execute_batch("ROLLBACK");
            }
        }
        result
    }
}
