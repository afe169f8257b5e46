// src/run/record.rs

use std::fmt;
use std::path::PathBuf;

use crate::plan::ExperimentConfig;
use crate::types::ScenarioKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Success,
    /// The run exited non-zero, was killed, or could not be started.
    LaunchFailure,
    /// The run was never started: its point could not be planned or its
    /// mandatory preparation failed.
    Skipped,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunOutcome::Success => "success",
            RunOutcome::LaunchFailure => "launch-failure",
            RunOutcome::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Result of one parameter point (or of the restore following a fault).
#[derive(Debug, Clone)]
pub struct RunRecord {
    pub scenario: ScenarioKind,
    pub parallelism: u32,
    /// `None` when no config could be built for the point.
    pub config: Option<ExperimentConfig>,
    pub log_path: PathBuf,
    pub outcome: RunOutcome,
    pub error_detail: Option<String>,
}

impl RunRecord {
    pub fn is_success(&self) -> bool {
        self.outcome == RunOutcome::Success
    }

    pub(crate) fn finished(
        scenario: ScenarioKind,
        config: ExperimentConfig,
        log_path: PathBuf,
        error_detail: Option<String>,
    ) -> Self {
        let outcome = match error_detail {
            None => RunOutcome::Success,
            Some(_) => RunOutcome::LaunchFailure,
        };
        Self {
            scenario,
            parallelism: config.parallelism(),
            config: Some(config),
            log_path,
            outcome,
            error_detail,
        }
    }

    pub(crate) fn skipped(
        scenario: ScenarioKind,
        config: ExperimentConfig,
        log_path: PathBuf,
        detail: String,
    ) -> Self {
        Self {
            scenario,
            parallelism: config.parallelism(),
            config: Some(config),
            log_path,
            outcome: RunOutcome::Skipped,
            error_detail: Some(detail),
        }
    }

    /// A point that never got a config, e.g. because its graph size overflows.
    pub(crate) fn unplanned(
        scenario: ScenarioKind,
        parallelism: u32,
        log_path: PathBuf,
        detail: String,
    ) -> Self {
        Self {
            scenario,
            parallelism,
            config: None,
            log_path,
            outcome: RunOutcome::Skipped,
            error_detail: Some(detail),
        }
    }
}
