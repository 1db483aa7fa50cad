//! # lmd CLI Entry Point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lmd_cli::config_check::{run_config, ConfigArgs};
use lmd_cli::query::{run_query, QueryArgs};
use lmd_cli::seed::{run_seed, SeedArgs};

/// Legal Metrology CLI — registry tooling for the LMD stack.
///
/// Runs the console's list pipeline over exported record files, exports
/// the seed dataset, and validates server configuration.
#[derive(Parser, Debug)]
#[command(name = "lmd", version, about)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Filter, paginate, and print a record file.
    Query(QueryArgs),

    /// Export the seed dataset as JSON files.
    Seed(SeedArgs),

    /// Configuration file operations.
    Config(ConfigArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Query(args) => run_query(&args),
        Commands::Seed(args) => run_seed(&args),
        Commands::Config(args) => run_config(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
