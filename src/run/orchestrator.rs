// src/run/orchestrator.rs

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::exec::{ExecutorBackend, Invocation, InvocationKind};
use crate::plan::{CommandBuilder, ExperimentConfig};
use crate::types::ScenarioKind;

use super::RunRecord;

/// Runs one engine invocation per call and turns whatever happens into a
/// [`RunRecord`]. Never returns an error.
pub struct RunOrchestrator {
    backend: Arc<dyn ExecutorBackend>,
    commands: CommandBuilder,
    log_dir: PathBuf,
}

impl RunOrchestrator {
    pub fn new(
        backend: Arc<dyn ExecutorBackend>,
        commands: CommandBuilder,
        log_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            backend,
            commands,
            log_dir: log_dir.into(),
        }
    }

    pub fn log_path(&self, log_name: &str) -> PathBuf {
        self.log_dir.join(log_name)
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Launch `config` on its hostfile, write output to `{log_dir}/{log_name}`
    /// and wait for the launcher to exit.
    pub async fn execute(
        &self,
        scenario: ScenarioKind,
        config: ExperimentConfig,
        log_name: &str,
    ) -> RunRecord {
        let log_path = self.log_path(log_name);
        let argv = self.commands.launch_argv(&config);
        let invocation = Invocation::new(InvocationKind::Run, argv).with_log(&log_path);

        info!(
            %scenario,
            graph_size = config.graph_size_millions(),
            parallelism = config.parallelism(),
            hostfile = config.hostfile(),
            log = %log_path.display(),
            "starting run"
        );

        let error_detail = match self.backend.run(invocation).await {
            Ok(report) if report.is_success() => None,
            Ok(report) => Some(report.describe()),
            Err(err) => Some(format!("{err:#}")),
        };

        match &error_detail {
            None => info!(%scenario, log = %log_path.display(), "run succeeded"),
            Some(detail) => warn!(
                %scenario,
                log = %log_path.display(),
                error = %detail,
                "run failed; continuing sweep"
            ),
        }

        RunRecord::finished(scenario, config, log_path, error_detail)
    }
}
