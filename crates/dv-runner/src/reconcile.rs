//! The reconciliation loop.

use crate::config::{FailurePolicy, LedgerErrorPolicy, RunnerConfig};
use crate::report::Reporter;
use dv_core::{
    sort_migrations, BatchOutcome, BatchStatus, ExecutionError, MigrationDescriptor,
    MigrationExecutor, MigrationKind, MigrationOutcome, VersionLedger,
};
use std::collections::HashMap;

/// Per-migration decision taken from the ledger
enum Decision {
    /// Most recent entry says applied
    Skip,
    /// Not applied, or ledger unreadable under `AssumePending`
    Run { warning: Option<String> },
    /// Ledger unreadable under `Abort`
    Halt(String),
}

/// Applies pending migrations in ascending version order.
///
/// Executors are registered per [`MigrationKind`]; a kind without an executor
/// fails the migration with [`ExecutionError::UnknownMigrationKind`].
pub struct Reconciler<'a> {
    config: RunnerConfig,
    ledger: &'a dyn VersionLedger,
    executors: HashMap<MigrationKind, &'a dyn MigrationExecutor>,
}

impl<'a> Reconciler<'a> {
    pub fn new(config: RunnerConfig, ledger: &'a dyn VersionLedger) -> Self {
        Self {
            config,
            ledger,
            executors: HashMap::new(),
        }
    }

    /// Use `executor` for every migration of `kind`.
    pub fn with_executor(
        mut self,
        kind: MigrationKind,
        executor: &'a dyn MigrationExecutor,
    ) -> Self {
        self.executors.insert(kind, executor);
        self
    }

    /// Reconcile `migrations` against the ledger.
    ///
    /// Input order does not matter; migrations are attempted by ascending
    /// version. Under [`FailurePolicy::Strict`] the first failure ends the
    /// batch and later migrations are never attempted. Applied migrations are
    /// never rolled back.
    pub fn run(
        &self,
        migrations: &[MigrationDescriptor],
        reporter: &mut dyn Reporter,
    ) -> BatchOutcome {
        let mut ordered = migrations.to_vec();
        sort_migrations(&mut ordered);

        let mut outcomes = Vec::with_capacity(ordered.len());
        for migration in &ordered {
            let (outcome, halt) = self.reconcile_one(migration);
            reporter.migration_finished(&outcome);

            if halt {
                reporter.aborted(&outcome);
                outcomes.push(outcome);
                return BatchOutcome {
                    status: BatchStatus::AbortedOnFailure,
                    migrations: outcomes,
                };
            }
            outcomes.push(outcome);
        }

        BatchOutcome {
            status: BatchStatus::Completed,
            migrations: outcomes,
        }
    }

    /// Decide and act on one migration. The flag is true when the batch must
    /// stop after it.
    fn reconcile_one(&self, migration: &MigrationDescriptor) -> (MigrationOutcome, bool) {
        let warning = match self.decide(migration) {
            Decision::Skip => {
                log::debug!("Skipping {}: already applied", migration.label());
                return (MigrationOutcome::skipped(migration), false);
            }
            Decision::Halt(err) => {
                return (MigrationOutcome::failed(migration, err), true);
            }
            Decision::Run { warning } => warning,
        };

        let result = match self.executors.get(&migration.kind) {
            Some(executor) => {
                log::debug!("Applying {} ({})", migration.label(), migration.kind);
                executor.execute(migration)
            }
            None => Err(ExecutionError::UnknownMigrationKind {
                version: migration.version,
                kind: migration.kind,
            }),
        };

        match result {
            Ok(()) => (
                MigrationOutcome::applied(migration).with_warning(warning),
                false,
            ),
            Err(err) => {
                let outcome = MigrationOutcome::failed(migration, &err).with_warning(warning);
                (outcome, self.config.failure_policy == FailurePolicy::Strict)
            }
        }
    }

    fn decide(&self, migration: &MigrationDescriptor) -> Decision {
        match self.ledger.latest_entry(migration.version) {
            Ok(Some(entry)) if entry.is_applied => Decision::Skip,
            Ok(_) => Decision::Run { warning: None },
            Err(err) => match self.config.ledger_error_policy {
                LedgerErrorPolicy::AssumePending => {
                    log::warn!("{err}; treating {} as not applied", migration.label());
                    Decision::Run {
                        warning: Some(format!("{err}; assumed not applied")),
                    }
                }
                LedgerErrorPolicy::Abort => Decision::Halt(err.to_string()),
            },
        }
    }
}

#[cfg(test)]
#[path = "reconcile_test.rs"]
mod tests;
