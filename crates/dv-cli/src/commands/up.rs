//! Up command implementation

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use dv_core::{BatchOutcome, MigrationKind, MigrationOutcome, MigrationStatus};
use dv_db::{DuckDbLedger, ProgrammaticExecutor, SqlScriptExecutor};
use dv_runner::{FailurePolicy, Reconciler, Reporter, RunnerConfig};
use serde::Serialize;
use std::time::Instant;

use crate::cli::{GlobalArgs, OutputFormat, UpArgs};
use crate::commands::common::{self, ExitCode};

/// JSON report for one `up` run
#[derive(Serialize)]
struct UpReport<'a> {
    environment: &'a str,
    timestamp: DateTime<Utc>,
    elapsed_secs: f64,
    #[serde(flatten)]
    batch: &'a BatchOutcome,
}

/// Prints one line per attempted migration as it finishes.
struct TextReporter {
    quiet: bool,
}

impl Reporter for TextReporter {
    fn migration_finished(&mut self, outcome: &MigrationOutcome) {
        match outcome.status {
            MigrationStatus::Skipped => {}
            _ if self.quiet => {}
            MigrationStatus::Applied => println!("OK    {}", outcome.label),
            MigrationStatus::Failed => {
                println!("FAIL  {}", outcome.label);
                if let Some(error) = &outcome.error {
                    eprintln!("      {error}");
                }
            }
        }
    }

    fn aborted(&mut self, failed: &MigrationOutcome) {
        let error = failed.error.as_deref().unwrap_or("migration failed");
        eprintln!("FAIL {error}, quitting migration");
    }
}

/// Execute the up command
pub(crate) fn execute(args: &UpArgs, global: &GlobalArgs) -> Result<()> {
    let start_time = Instant::now();
    let json_mode = args.output == OutputFormat::Json;

    let conf = common::load_conf(global)?;
    let registry = common::programmatic_registry();
    let migrations = common::load_migrations(&conf, &registry)?;
    let db = common::open_database(&conf)?;
    let ledger = DuckDbLedger::new(&db);

    if !json_mode {
        println!("drover: migrating environment '{}'", conf.env);
    }
    log::debug!(
        "{} migration(s) known in {}",
        migrations.len(),
        conf.migrations_dir.display()
    );

    let scripted = SqlScriptExecutor::new(&db, &ledger);
    let programmatic = ProgrammaticExecutor::new(&db, &ledger, &registry);
    let config = RunnerConfig::new(
        FailurePolicy::from_strict(args.strict),
        args.on_ledger_error.into(),
    );
    let reconciler = Reconciler::new(config, &ledger)
        .with_executor(MigrationKind::Scripted, &scripted)
        .with_executor(MigrationKind::Programmatic, &programmatic);

    let mut reporter = TextReporter { quiet: json_mode };
    let outcome = reconciler.run(&migrations, &mut reporter);

    if json_mode {
        let report = UpReport {
            environment: &conf.env,
            timestamp: Utc::now(),
            elapsed_secs: start_time.elapsed().as_secs_f64(),
            batch: &outcome,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if outcome.count(MigrationStatus::Skipped) == outcome.migrations.len() {
        let version = ledger
            .current_version()
            .context("Failed to read database version")?;
        println!("drover: no migrations to run. current version: {version}");
    } else {
        println!(
            "drover: {} applied, {} failed in {}ms",
            outcome.count(MigrationStatus::Applied),
            outcome.count(MigrationStatus::Failed),
            start_time.elapsed().as_millis()
        );
    }

    if outcome.is_aborted() {
        return Err(ExitCode(1).into());
    }
    Ok(())
}
