//! # vrtk CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use vrtk_cli::simulate::{run_simulate, SimulateArgs};
use vrtk_cli::validate::{run_validate, ValidateArgs};

/// VR Training Kit fastener toolchain.
///
/// Validates screw, valve and turn-by-count profiles and replays scripted
/// interaction scenarios against an in-memory host.
#[derive(Parser, Debug)]
#[command(name = "vrtk", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate fastener profiles and print the effective configuration.
    Validate(ValidateArgs),

    /// Replay a scenario and print the resulting report.
    Simulate(SimulateArgs),
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
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("vrtk CLI starting");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Simulate(args) => run_simulate(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
