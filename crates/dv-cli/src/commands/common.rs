//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use dv_core::{collect_migrations, merge_migrations, DbConf, MigrationDescriptor, VersionRange};
use dv_db::{Database, DuckDbLedger, ProgrammaticRegistry};
use std::fmt;
use std::path::Path;

use crate::cli::GlobalArgs;

/// Error type representing a non-zero process exit code.
///
/// Use `return Err(ExitCode(N).into())` instead of `std::process::exit(N)`
/// so that the database handle is closed before the process exits.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) i32);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only. Nothing user-facing to print.
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Load `dbconf.yml` for the selected environment.
pub(crate) fn load_conf(global: &GlobalArgs) -> Result<DbConf> {
    DbConf::load(
        Path::new(&global.path),
        &global.env,
        global.schema.as_deref(),
    )
    .context("Failed to load database configuration")
}

/// Open the configured database and make sure the version ledger exists.
pub(crate) fn open_database(conf: &DbConf) -> Result<Database> {
    let db = Database::connect(conf).context("Failed to open database")?;
    DuckDbLedger::new(&db)
        .ensure_version_table()
        .context("Failed to prepare version ledger")?;
    Ok(db)
}

/// Migrations implemented in Rust and compiled into this binary.
///
/// Register with `registry.register(version, name, |conn| ...)`; versions
/// share one namespace with the files in the migrations directory.
pub(crate) fn programmatic_registry() -> ProgrammaticRegistry {
    ProgrammaticRegistry::new()
}

/// Every known migration, directory files and compiled-in ones, in
/// ascending version order.
pub(crate) fn load_migrations(
    conf: &DbConf,
    registry: &ProgrammaticRegistry,
) -> Result<Vec<MigrationDescriptor>> {
    let range = VersionRange::default();
    let scripted = collect_migrations(&conf.migrations_dir, range)
        .context("Failed to collect migrations")?;
    merge_migrations(scripted, registry.descriptors(range))
        .context("Failed to merge programmatic migrations")
}
