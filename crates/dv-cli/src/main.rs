//! Drover CLI - apply pending database migrations in version order

use clap::Parser;

mod cli;
mod commands;

use cli::Cli;
use commands::common::ExitCode;
use commands::{dbversion, status, up};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        cli::Commands::Up(args) => up::execute(args, &cli.global),
        cli::Commands::Status => status::execute(&cli.global),
        cli::Commands::Dbversion => dbversion::execute(&cli.global),
    };

    // Commands have returned, so the database handle is already closed.
    if let Err(err) = result {
        if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
            std::process::exit(*code);
        }
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

/// Route `log` output to stderr. `RUST_LOG` overrides the default filter.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .format_target(false)
        .init();
}
