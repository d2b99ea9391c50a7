//! Progress reporting hooks

use dv_core::MigrationOutcome;

/// Receives reconciliation progress as it happens.
pub trait Reporter {
    /// Called once per migration, in attempt order, including skips.
    fn migration_finished(&mut self, outcome: &MigrationOutcome);

    /// Called after `failed` when the batch stops early.
    fn aborted(&mut self, failed: &MigrationOutcome);
}

/// Reporter that discards everything.
#[derive(Debug, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn migration_finished(&mut self, _outcome: &MigrationOutcome) {}

    fn aborted(&mut self, _failed: &MigrationOutcome) {}
}
