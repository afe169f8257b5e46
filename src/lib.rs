// src/lib.rs

pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod plan;
pub mod report;
pub mod run;
pub mod sweep;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{SweepFile, load_and_validate};
use crate::exec::ProcessBackend;
use crate::plan::ScenarioSpec;
use crate::sweep::SweepController;
use crate::types::ScenarioKind;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - sweep file loading
/// - scenario selection (`--only`)
/// - the sweep controller on top of the real process backend
/// - dry-run and summary output
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let file = load_and_validate(&config_path)?;

    let scenarios = select_scenarios(&file, &args.only);
    if scenarios.is_empty() {
        bail!(
            "no scenario in {} matches --only {:?}",
            config_path.display(),
            args.only
        );
    }

    let controller = SweepController::new(&file, Arc::new(ProcessBackend::new()));

    if args.dry_run {
        let plan = controller.plan(&scenarios);
        report::print_plan(&plan);
        return Ok(());
    }

    info!(scenarios = scenarios.len(), "starting sweep");
    let records = controller.run(&scenarios).await;
    let (ok, failed, skipped) = report::tally(&records);
    info!(ok, failed, skipped, "sweep complete");

    report::print_summary(&records);
    Ok(())
}

/// Scenarios of the sweep file, in file order, restricted to `only` when it
/// is non-empty.
pub fn select_scenarios(file: &SweepFile, only: &[ScenarioKind]) -> Vec<ScenarioSpec> {
    ScenarioSpec::all_from_file(file)
        .into_iter()
        .filter(|s| only.is_empty() || only.contains(&s.kind))
        .collect()
}
