//! Error types for dv-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Transaction management error (D003)
    #[error("[D003] Transaction failed: {0}")]
    TransactionError(String),

    /// Ledger table could not be created or written (D004)
    #[error("[D004] Version ledger error: {0}")]
    LedgerError(String),

    /// Two programmatic migrations registered for one version (D005)
    #[error("[D005] Programmatic migration {version} registered twice: '{first}' and '{second}'")]
    DuplicateMigration {
        version: i64,
        first: String,
        second: String,
    },
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
