//! Dbversion command implementation

use anyhow::{Context, Result};
use dv_db::DuckDbLedger;

use crate::cli::GlobalArgs;
use crate::commands::common;

/// Execute the dbversion command
pub(crate) fn execute(global: &GlobalArgs) -> Result<()> {
    let conf = common::load_conf(global)?;
    let db = common::open_database(&conf)?;
    let version = DuckDbLedger::new(&db)
        .current_version()
        .context("Failed to read database version")?;
    println!("drover: dbversion {version}");
    Ok(())
}
