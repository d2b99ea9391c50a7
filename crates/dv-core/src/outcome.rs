//! Batch outcome types produced by a reconciliation run

use crate::migration::{MigrationDescriptor, MigrationKind};
use serde::Serialize;
use std::fmt;

/// Result of reconciling one migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MigrationStatus {
    Applied,
    Skipped,
    Failed,
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationStatus::Applied => write!(f, "applied"),
            MigrationStatus::Skipped => write!(f, "skipped"),
            MigrationStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Overall status of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Every migration was attempted
    Completed,
    /// The batch stopped at the first failure
    AbortedOnFailure,
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchStatus::Completed => write!(f, "completed"),
            BatchStatus::AbortedOnFailure => write!(f, "aborted_on_failure"),
        }
    }
}

/// Per-migration record
#[derive(Debug, Clone, Serialize)]
pub struct MigrationOutcome {
    pub version: i64,
    pub label: String,
    pub kind: MigrationKind,
    pub status: MigrationStatus,

    /// Error message for failed migrations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Set when the decision to run was made without a ledger read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl MigrationOutcome {
    pub fn applied(migration: &MigrationDescriptor) -> Self {
        Self::new(migration, MigrationStatus::Applied, None)
    }

    pub fn skipped(migration: &MigrationDescriptor) -> Self {
        Self::new(migration, MigrationStatus::Skipped, None)
    }

    pub fn failed(migration: &MigrationDescriptor, error: impl fmt::Display) -> Self {
        Self::new(migration, MigrationStatus::Failed, Some(error.to_string()))
    }

    /// Attach an operator warning.
    pub fn with_warning(mut self, warning: Option<String>) -> Self {
        self.warning = warning;
        self
    }

    fn new(migration: &MigrationDescriptor, status: MigrationStatus, error: Option<String>) -> Self {
        Self {
            version: migration.version,
            label: migration.label().to_string(),
            kind: migration.kind,
            status,
            error,
            warning: None,
        }
    }
}

/// Derived result of one reconciliation run. Not persisted.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub status: BatchStatus,
    pub migrations: Vec<MigrationOutcome>,
}

impl BatchOutcome {
    /// Number of migrations that ended with `status`.
    pub fn count(&self, status: MigrationStatus) -> usize {
        self.migrations
            .iter()
            .filter(|m| m.status == status)
            .count()
    }

    /// Versions that ended with `status`, in attempt order.
    pub fn versions_with(&self, status: MigrationStatus) -> Vec<i64> {
        self.migrations
            .iter()
            .filter(|m| m.status == status)
            .map(|m| m.version)
            .collect()
    }

    pub fn is_aborted(&self) -> bool {
        self.status == BatchStatus::AbortedOnFailure
    }
}
