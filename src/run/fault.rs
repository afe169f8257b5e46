// src/run/fault.rs

//! Fault injection for checkpoint/fault scenarios.
//!
//! ```text
//! CLEAN_CHECKPOINTS -> RUN_WITH_CHECKPOINTING -> (async) SCHEDULED_KILL -> RUN_TERMINATED
//! RUN_TERMINATED -> RESTORE_RUN(dead_workers) -> COMPLETE
//! ```
//!
//! The sweep controller drives the first two states; this module owns the
//! delayed kill and the restore run.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::checkpoint::CheckpointManager;
use crate::exec::{ExecutorBackend, Invocation, InvocationKind, command_line};
use crate::plan::ExperimentConfig;
use crate::types::ScenarioKind;

use super::{RunOrchestrator, RunRecord};

pub struct FaultInjector {
    backend: Arc<dyn ExecutorBackend>,
}

/// A pending delayed kill.
///
/// Dropping the handle leaves the kill scheduled; [`KillHandle::cancel`]
/// withdraws it if it has not fired yet.
#[derive(Debug)]
pub struct KillHandle {
    handle: JoinHandle<()>,
}

impl KillHandle {
    pub fn cancel(self) {
        if self.handle.is_finished() {
            return;
        }
        debug!("targeted run ended before the scheduled kill; withdrawing it");
        self.handle.abort();
    }
}

impl FaultInjector {
    pub fn new(backend: Arc<dyn ExecutorBackend>) -> Self {
        Self { backend }
    }

    /// Issue `kill_command` after `after` has elapsed. Returns immediately.
    pub fn schedule_kill(&self, after: Duration, kill_command: &[String]) -> KillHandle {
        let backend = Arc::clone(&self.backend);
        let argv = kill_command.to_vec();

        info!(delay_secs = after.as_secs_f64(), cmd = %command_line(&argv), "scheduling kill");

        let handle = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            info!(cmd = %command_line(&argv), "injecting fault");
            match backend.run(Invocation::new(InvocationKind::Kill, argv)).await {
                Ok(report) if report.is_success() => info!("kill delivered"),
                Ok(report) => warn!(
                    result = %report.describe(),
                    "kill command reported failure; target may already have exited"
                ),
                Err(err) => warn!(error = %format!("{err:#}"), "could not issue kill command"),
            }
        });

        KillHandle { handle }
    }

    /// Restore from `base`'s checkpoints with `dead_workers` marked failed.
    ///
    /// The restore reads from `base`'s write path and writes into a freshly
    /// cleared restore location. The outcome is recorded whatever it is;
    /// nothing is retried.
    pub async fn restore(
        &self,
        scenario: ScenarioKind,
        base: &ExperimentConfig,
        dead_workers: &BTreeSet<u32>,
        checkpoints: &CheckpointManager,
        orchestrator: &RunOrchestrator,
        log_name: &str,
    ) -> RunRecord {
        let graph_size = base.graph_size_millions();

        let prepared = checkpoints
            .prepare_restore_location(graph_size, base.hostfile())
            .await;
        match prepared {
            Ok(write_path) => {
                let config = base.for_restore(write_path, dead_workers.iter().copied());
                info!(
                    %scenario,
                    graph_size,
                    read = %config.checkpoint_read_path().display(),
                    dead_workers = ?dead_workers,
                    "starting restore run"
                );
                orchestrator.execute(scenario, config, log_name).await
            }
            Err(err) => {
                let config = base.for_restore(
                    checkpoints.layout().restore_write_path(graph_size),
                    dead_workers.iter().copied(),
                );
                warn!(%scenario, graph_size, error = %err, "skipping restore run");
                RunRecord::skipped(
                    scenario,
                    config,
                    orchestrator.log_path(log_name),
                    err.to_string(),
                )
            }
        }
    }
}
