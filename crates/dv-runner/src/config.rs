//! Runner configuration

use serde::Serialize;

/// What a failed migration does to the rest of the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Record the failure and keep going (default)
    #[default]
    Lenient,
    /// Stop the batch at the first failure
    Strict,
}

impl FailurePolicy {
    /// Map the CLI's boolean strict flag onto a policy.
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            FailurePolicy::Strict
        } else {
            FailurePolicy::Lenient
        }
    }
}

/// What an unreadable ledger means for a migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LedgerErrorPolicy {
    /// Treat the migration as pending and warn the operator (default)
    #[default]
    AssumePending,
    /// Fail the migration and stop the batch
    Abort,
}

/// Settings passed to [`Reconciler::new`](crate::Reconciler::new)
#[derive(Debug, Clone, Copy, Default)]
pub struct RunnerConfig {
    pub failure_policy: FailurePolicy,
    pub ledger_error_policy: LedgerErrorPolicy,
}

impl RunnerConfig {
    pub fn new(failure_policy: FailurePolicy, ledger_error_policy: LedgerErrorPolicy) -> Self {
        Self {
            failure_policy,
            ledger_error_policy,
        }
    }
}
