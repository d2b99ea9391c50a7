//! Status command implementation

use anyhow::{Context, Result};
use dv_core::{LedgerEntry, VersionLedger};
use dv_db::DuckDbLedger;

use crate::cli::GlobalArgs;
use crate::commands::common;

const APPLIED_AT_WIDTH: usize = 24;

/// Execute the status command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let conf = common::load_conf(global)?;
    let registry = common::programmatic_registry();
    let migrations = common::load_migrations(&conf, &registry)?;
    let db = common::open_database(&conf)?;
    let ledger = DuckDbLedger::new(&db);

    println!("drover: status for environment '{}'", conf.env);
    println!("    {:<APPLIED_AT_WIDTH$} Migration", "Applied At");
    println!("    {}", "=".repeat(APPLIED_AT_WIDTH + 24));

    for migration in &migrations {
        let entry = ledger
            .latest_entry(migration.version)
            .with_context(|| format!("Failed to read ledger for {}", migration.label()))?;
        println!(
            "    {:<APPLIED_AT_WIDTH$} -- {}",
            applied_at(entry.as_ref()),
            migration.label()
        );
    }
    Ok(())
}

fn applied_at(entry: Option<&LedgerEntry>) -> String {
    match entry {
        Some(e) if e.is_applied => e.applied_at.format("%a %b %e %H:%M:%S %Y").to_string(),
        _ => "Pending".to_string(),
    }
}
