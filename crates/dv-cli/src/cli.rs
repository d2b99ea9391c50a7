//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use dv_runner::LedgerErrorPolicy;

/// Drover - apply pending database migrations in version order
#[derive(Parser, Debug)]
#[command(name = "drover")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Folder containing dbconf.yml and the migrations directory
    #[arg(short = 'p', long, global = true, default_value = "db")]
    pub path: String,

    /// Environment in dbconf.yml to use
    #[arg(short, long, global = true, env = "DROVER_ENV", default_value = "development")]
    pub env: String,

    /// Schema to migrate (overrides the environment's schema)
    #[arg(short, long, global = true)]
    pub schema: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply every pending migration
    Up(UpArgs),

    /// Show applied and pending migrations
    Status,

    /// Print the current database version
    Dbversion,
}

/// Arguments for the up command
#[derive(Args, Debug)]
pub struct UpArgs {
    /// Stop at the first failed migration and exit non-zero
    #[arg(long, env = "DROVER_STRICT")]
    pub strict: bool,

    /// What to do when the version ledger cannot be read
    #[arg(long, value_enum, default_value = "assume-pending")]
    pub on_ledger_error: LedgerErrorArg,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,
}

/// Ledger read failure handling
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerErrorArg {
    /// Run the migration anyway and warn
    AssumePending,
    /// Fail the migration and stop
    Abort,
}

impl From<LedgerErrorArg> for LedgerErrorPolicy {
    fn from(arg: LedgerErrorArg) -> Self {
        match arg {
            LedgerErrorArg::AssumePending => LedgerErrorPolicy::AssumePending,
            LedgerErrorArg::Abort => LedgerErrorPolicy::Abort,
        }
    }
}

/// Output formats
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable lines
    Text,
    /// JSON batch outcome
    Json,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
