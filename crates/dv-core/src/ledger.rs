//! Version ledger contract
//!
//! The ledger is an append-only history of apply attempts. Only the most
//! recent entry for a version says whether that version is currently applied.

use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;

/// One row of ledger history
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    /// Migration version
    pub version: i64,

    /// When the row was written
    pub applied_at: NaiveDateTime,

    /// Whether the version was applied (`false` records a rollback)
    pub is_applied: bool,
}

/// Ledger read errors
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Storage could not be read (L001)
    #[error("[L001] Version ledger unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the version ledger.
pub trait VersionLedger {
    /// Most recent entry for `version`, or `None` when the version has never
    /// been recorded.
    ///
    /// Ties on timestamp resolve to the latest inserted row. Read failures are
    /// reported as [`LedgerError::Unavailable`], never as `None`.
    fn latest_entry(&self, version: i64) -> Result<Option<LedgerEntry>, LedgerError>;
}
