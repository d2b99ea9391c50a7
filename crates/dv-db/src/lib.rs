//! dv-db - Database layer for Drover
//!
//! This crate owns the DuckDB connection, the `drover_db_version` ledger
//! table, and the executors for scripted and programmatic migrations.

pub mod database;
pub mod error;
pub mod executor;
pub mod ledger;
pub mod programmatic;

pub use database::Database;
pub use error::{DbError, DbResult};
pub use executor::SqlScriptExecutor;
pub use ledger::{DuckDbLedger, LEDGER_TABLE};
pub use programmatic::{ProgrammaticExecutor, ProgrammaticMigration, ProgrammaticRegistry};
