// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::ScenarioKind;

/// Command-line arguments for `shardsweep`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "shardsweep",
    version,
    about = "Run scaling and fault-tolerance sweeps against a distributed graph engine.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the sweep file (TOML).
    #[arg(long, value_name = "PATH", default_value = "Shardsweep.toml")]
    pub config: String,

    /// Only run scenarios of this kind (repeatable). Config order is kept.
    #[arg(long, value_name = "KIND", value_parser = parse_scenario_kind)]
    pub only: Vec<ScenarioKind>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SHARDSWEEP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print every planned command, but don't execute anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

fn parse_scenario_kind(s: &str) -> Result<ScenarioKind, String> {
    s.parse()
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_flag_is_repeatable() {
        let args = CliArgs::try_parse_from([
            "shardsweep",
            "--only",
            "size-scaling",
            "--only",
            "checkpoint_fault",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(
            args.only,
            vec![ScenarioKind::SizeScaling, ScenarioKind::CheckpointFault]
        );
        assert!(args.dry_run);
        assert_eq!(args.config, "Shardsweep.toml");
    }

    #[test]
    fn unknown_scenario_is_rejected() {
        assert!(CliArgs::try_parse_from(["shardsweep", "--only", "pagerank"]).is_err());
    }
}
