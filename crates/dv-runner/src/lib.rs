//! dv-runner - Migration reconciliation for Drover
//!
//! The [`Reconciler`] walks migration descriptors in ascending version order,
//! asks the [`VersionLedger`](dv_core::VersionLedger) whether each one is
//! already applied, dispatches pending ones to the executor registered for
//! their kind, and applies the batch [`FailurePolicy`].

pub mod config;
pub mod reconcile;
pub mod report;

pub use config::{FailurePolicy, LedgerErrorPolicy, RunnerConfig};
pub use reconcile::Reconciler;
pub use report::{NoopReporter, Reporter};
