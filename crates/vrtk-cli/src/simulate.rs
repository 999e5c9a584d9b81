//! # Simulate Subcommand
//!
//! Replays a scenario document against the in-memory world and prints the
//! report as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use vrtk_sim::{Scenario, ScenarioReport};

/// Arguments for the `vrtk simulate` subcommand.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Scenario document (YAML, or JSON by extension).
    #[arg(value_name = "SCENARIO")]
    pub scenario: PathBuf,

    /// Exit with code 2 when any fastener recorded a diagnostic.
    #[arg(long)]
    pub fail_on_diagnostics: bool,

    /// Print compact single-line JSON.
    #[arg(long)]
    pub compact: bool,
}

/// Load and run a scenario file.
pub fn simulate_file(args: &SimulateArgs) -> Result<ScenarioReport> {
    let scenario: Scenario = crate::read_document(&args.scenario)
        .with_context(|| format!("failed to load {}", args.scenario.display()))?;
    let report = scenario
        .run()
        .with_context(|| format!("scenario {} failed", args.scenario.display()))?;
    tracing::info!(
        scenario = %args.scenario.display(),
        ticks = report.ticks,
        events = report.events.len(),
        "scenario complete"
    );
    Ok(report)
}

/// Execute the simulate subcommand.
pub fn run_simulate(args: &SimulateArgs) -> Result<u8> {
    let report = simulate_file(args)?;
    println!("{}", crate::to_json(&report, args.compact)?);

    let diagnostics: usize = report.fasteners.iter().map(|f| f.diagnostics.len()).sum();
    if args.fail_on_diagnostics && diagnostics > 0 {
        tracing::warn!(diagnostics, "scenario produced diagnostics");
        return Ok(2);
    }
    Ok(0)
}
