//! Programmatic migrations: Rust functions compiled into the binary.
//!
//! ```no_run
//! use dv_db::ProgrammaticRegistry;
//!
//! let mut registry = ProgrammaticRegistry::new();
//! registry
//!     .register(4, "00004_backfill_slugs", |conn| {
//!         conn.execute_batch("UPDATE posts SET slug = lower(title) WHERE slug IS NULL")?;
//!         Ok(())
//!     })
//!     .unwrap();
//! ```

use crate::database::Database;
use crate::error::{DbError, DbResult};
use crate::ledger::DuckDbLedger;
use duckdb::Connection;
use dv_core::{ExecutionError, MigrationDescriptor, MigrationExecutor, VersionRange};
use std::collections::BTreeMap;

/// Body of a programmatic migration.
pub type MigrationFn = Box<dyn Fn(&Connection) -> DbResult<()> + Send + Sync>;

/// One registered programmatic migration
pub struct ProgrammaticMigration {
    pub version: i64,
    pub name: String,
    up: MigrationFn,
}

impl std::fmt::Debug for ProgrammaticMigration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgrammaticMigration")
            .field("version", &self.version)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Programmatic migrations keyed by version
#[derive(Debug, Default)]
pub struct ProgrammaticRegistry {
    migrations: BTreeMap<i64, ProgrammaticMigration>,
}

impl ProgrammaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `up` as the migration for `version`.
    pub fn register<F>(&mut self, version: i64, name: &str, up: F) -> DbResult<()>
    where
        F: Fn(&Connection) -> DbResult<()> + Send + Sync + 'static,
    {
        if let Some(existing) = self.migrations.get(&version) {
            return Err(DbError::DuplicateMigration {
                version,
                first: existing.name.clone(),
                second: name.to_string(),
            });
        }
        self.migrations.insert(
            version,
            ProgrammaticMigration {
                version,
                name: name.to_string(),
                up: Box::new(up),
            },
        );
        Ok(())
    }

    pub fn get(&self, version: i64) -> Option<&ProgrammaticMigration> {
        self.migrations.get(&version)
    }

    /// Descriptors for registered migrations inside `range`, ascending.
    pub fn descriptors(&self, range: VersionRange) -> Vec<MigrationDescriptor> {
        self.migrations
            .values()
            .filter(|m| range.contains(m.version))
            .map(|m| MigrationDescriptor::programmatic(m.version, &m.name))
            .collect()
    }
}

/// Runs registered programmatic migrations and records them, in one
/// transaction.
pub struct ProgrammaticExecutor<'a> {
    db: &'a Database,
    ledger: &'a DuckDbLedger<'a>,
    registry: &'a ProgrammaticRegistry,
}

impl<'a> ProgrammaticExecutor<'a> {
    pub fn new(
        db: &'a Database,
        ledger: &'a DuckDbLedger<'a>,
        registry: &'a ProgrammaticRegistry,
    ) -> Self {
        Self {
            db,
            ledger,
            registry,
        }
    }
}

impl MigrationExecutor for ProgrammaticExecutor<'_> {
    fn execute(&self, migration: &MigrationDescriptor) -> Result<(), ExecutionError> {
        let registered =
            self.registry
                .get(migration.version)
                .ok_or(ExecutionError::NotRegistered {
                    version: migration.version,
                })?;

        self.db
            .transaction(|conn| {
                (registered.up)(conn)?;
                self.ledger.record(migration.version, true)
            })
            .map_err(|e| ExecutionError::Failed {
                version: migration.version,
                message: e.to_string(),
            })
    }
}
