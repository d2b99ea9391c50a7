//! dv-core - Core library for Drover
//!
//! This crate provides the shared types used across all Drover components:
//! environment configuration, migration descriptors and their discovery,
//! SQL script parsing, batch outcome types, and the ledger/executor traits
//! the reconciliation loop is written against.

pub mod config;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod migration;
pub mod outcome;
pub mod sql_script;
pub mod sql_utils;

pub use config::{DbConf, Driver, EnvironmentConfig};
pub use error::{CoreError, CoreResult};
pub use executor::{ExecutionError, MigrationExecutor};
pub use ledger::{LedgerEntry, LedgerError, VersionLedger};
pub use migration::{
    collect_migrations, merge_migrations, sort_migrations, MigrationDescriptor, MigrationKind,
    VersionRange,
};
pub use outcome::{BatchOutcome, BatchStatus, MigrationOutcome, MigrationStatus};
pub use sql_script::{parse_up_statements, ScriptError};
