//! # changeset CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! JSON reports go to stdout; logs go to stderr.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use changeset_cli::check::{run_check, CheckArgs};
use changeset_cli::describe::{run_describe, DescribeArgs};

/// Inspect field schemas and validate pending changes against them.
#[derive(Parser, Debug)]
#[command(name = "changeset", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the compiled configuration of every field in a schema.
    Describe(DescribeArgs),

    /// Stage changes against a schema and report the validation snapshot.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("changeset CLI starting");

    let result = match cli.command {
        Commands::Describe(args) => run_describe(&args),
        Commands::Check(args) => run_check(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
