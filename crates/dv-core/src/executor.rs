//! Migration executor contract

use crate::migration::{MigrationDescriptor, MigrationKind};
use crate::sql_script::ScriptError;
use thiserror::Error;

/// A single migration failed to run
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// X001: Migration source could not be read
    #[error("[X001] Failed to read migration '{path}': {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// X002: Migration script is malformed
    #[error("[X002] Invalid migration script '{path}': {source}")]
    InvalidScript { path: String, source: ScriptError },

    /// X003: The database rejected the migration
    #[error("[X003] Migration {version} failed: {message}")]
    Failed { version: i64, message: String },

    /// X004: No executor is registered for the migration's kind
    #[error("[X004] Unknown migration kind: no executor registered for {kind} migration {version}")]
    UnknownMigrationKind { version: i64, kind: MigrationKind },

    /// X005: No programmatic migration is registered for the version
    #[error("[X005] No programmatic migration registered for version {version}")]
    NotRegistered { version: i64 },
}

/// Runs one migration against the database and records it in the ledger.
pub trait MigrationExecutor {
    /// Execute `migration`. On success the ledger holds an applied entry for
    /// its version; on failure nothing from the migration is committed.
    fn execute(&self, migration: &MigrationDescriptor) -> Result<(), ExecutionError>;
}
