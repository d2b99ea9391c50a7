//! Executor for annotated SQL migration scripts.

use crate::database::Database;
use crate::ledger::DuckDbLedger;
use dv_core::{parse_up_statements, ExecutionError, MigrationDescriptor, MigrationExecutor};

/// Runs the Up section of a `.sql` migration and records it, in one
/// transaction.
pub struct SqlScriptExecutor<'a> {
    db: &'a Database,
    ledger: &'a DuckDbLedger<'a>,
}

impl<'a> SqlScriptExecutor<'a> {
    pub fn new(db: &'a Database, ledger: &'a DuckDbLedger<'a>) -> Self {
        Self { db, ledger }
    }
}

impl MigrationExecutor for SqlScriptExecutor<'_> {
    fn execute(&self, migration: &MigrationDescriptor) -> Result<(), ExecutionError> {
        let script =
            std::fs::read_to_string(&migration.source).map_err(|e| ExecutionError::Read {
                path: migration.source.clone(),
                source: e,
            })?;
        let statements =
            parse_up_statements(&script).map_err(|e| ExecutionError::InvalidScript {
                path: migration.source.clone(),
                source: e,
            })?;
        log::debug!(
            "Running {} statement(s) from {}",
            statements.len(),
            migration.label()
        );

        self.db
            .transaction(|conn| {
                for stmt in &statements {
                    conn.execute_batch(stmt)?;
                }
                self.ledger.record(migration.version, true)
            })
            .map_err(|e| ExecutionError::Failed {
                version: migration.version,
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
