// src/report.rs

//! Human-readable output on stdout: the dry-run plan and the final summary.

use crate::exec::command_line;
use crate::run::{RunOutcome, RunRecord};
use crate::sweep::PlannedRun;

/// Print every planned invocation.
pub fn print_plan(runs: &[PlannedRun]) {
    println!("shardsweep dry-run ({} points)", runs.len());
    for run in runs {
        println!();
        let commands = match &run.commands {
            Ok(commands) => commands,
            Err(reason) => {
                println!(
                    "  [{}] parallelism {}: skipped ({reason})",
                    run.scenario, run.parallelism
                );
                continue;
            }
        };

        println!(
            "  [{}] {}M vertices, parallelism {}, {} iterations",
            run.scenario,
            commands.config.graph_size_millions(),
            run.parallelism,
            commands.config.iteration_count()
        );
        if let Some(argv) = &commands.provision_argv {
            println!("      build: {}", command_line(argv));
        }
        println!(
            "      run ({}): {}",
            run.log_name,
            command_line(&commands.launch_argv)
        );
        if let Some((log_name, argv)) = &commands.restore {
            println!("      restore ({log_name}): {}", command_line(argv));
        }
    }
}

/// Counts per outcome: (success, launch failure, skipped).
pub fn tally(records: &[RunRecord]) -> (usize, usize, usize) {
    records
        .iter()
        .fold((0, 0, 0), |(ok, failed, skipped), r| match r.outcome {
            RunOutcome::Success => (ok + 1, failed, skipped),
            RunOutcome::LaunchFailure => (ok, failed + 1, skipped),
            RunOutcome::Skipped => (ok, failed, skipped + 1),
        })
}

/// Print one line per record followed by the totals.
pub fn print_summary(records: &[RunRecord]) {
    println!("shardsweep summary ({} runs)", records.len());
    for r in records {
        let size = r
            .config
            .as_ref()
            .map_or_else(|| "-".to_string(), |c| format!("{}M", c.graph_size_millions()));
        let detail = r.error_detail.as_deref().unwrap_or("");
        println!(
            "  {:<16} {:>7}  n={:<5} {:<14} {}  {}",
            r.scenario.as_str(),
            size,
            r.parallelism,
            r.outcome.to_string(),
            r.log_path.display(),
            detail
        );
    }
    let (ok, failed, skipped) = tally(records);
    println!("  {ok} succeeded, {failed} failed, {skipped} skipped");
}
