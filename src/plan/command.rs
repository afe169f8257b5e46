// src/plan/command.rs

//! Command builder: maps an [`ExperimentConfig`] to an argument list.
//!
//! Nothing here spawns anything. The resulting argv is wrapped in an
//! [`Invocation`](crate::exec::Invocation) and handed to whichever
//! [`ExecutorBackend`](crate::exec::ExecutorBackend) is in use.

use crate::config::{ClusterSection, EngineSection, SweepFile};

use super::{ExperimentConfig, RunMode};

/// Stands for the run's hostfile inside `[cluster].shell`.
pub const HOSTFILE_PLACEHOLDER: &str = "{hostfile}";

/// Engine flags for `config`, in a fixed order.
///
/// Graph construction carries only the sizing flags; timed runs add the
/// checkpoint flags, the dead-worker list (when non-empty) and the step delay.
/// Scenario extra flags always come last.
pub fn engine_flags(config: &ExperimentConfig) -> Vec<String> {
    let mut flags = Vec::new();

    if config.mode == RunMode::BuildGraph {
        flags.push("--build_graph".to_string());
    }
    flags.push(format!("--nodes={}", config.node_count()));
    flags.push(format!("--shards={}", config.shard_count));
    flags.push(format!("--iterations={}", config.iteration_count));
    flags.push(format!("--work_stealing={}", config.work_stealing));
    flags.push(format!(
        "--graph_prefix={}",
        config.graph_path_prefix.display()
    ));

    if config.mode == RunMode::Compute {
        flags.push(format!(
            "--checkpoint_write_dir={}",
            config.checkpoint_write_path.display()
        ));
        flags.push(format!(
            "--checkpoint_read_dir={}",
            config.checkpoint_read_path.display()
        ));
        flags.push(format!("--checkpoint={}", config.checkpoint_enabled));
        if !config.dead_workers.is_empty() {
            let ids: Vec<String> = config.dead_workers.iter().map(u32::to_string).collect();
            flags.push(format!("--dead_workers={}", ids.join(",")));
        }
        flags.push(format!("--sleep_time={}", config.sleep_time));
    }

    flags.extend(config.extra_flags.iter().cloned());
    flags
}

/// Wraps engine flags in the launcher and cluster-shell command lines.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    engine: EngineSection,
    shell: Vec<String>,
}

impl CommandBuilder {
    pub fn new(engine: EngineSection, cluster: &ClusterSection) -> Self {
        Self {
            engine,
            shell: cluster.shell.clone(),
        }
    }

    pub fn from_file(file: &SweepFile) -> Self {
        Self::new(file.engine.clone(), &file.cluster)
    }

    pub fn runner(&self) -> &str {
        &self.engine.runner
    }

    /// Full launcher command line for one engine invocation.
    ///
    /// Timed runs start `parallelism + 1` processes (one master plus one per
    /// worker). Graph construction omits `-n` so the launcher fills every
    /// hostfile slot.
    pub fn launch_argv(&self, config: &ExperimentConfig) -> Vec<String> {
        let mut argv = vec![
            self.engine.launcher.clone(),
            "-hostfile".to_string(),
            config.hostfile.clone(),
            "-bynode".to_string(),
        ];

        if config.mode == RunMode::Compute {
            argv.push("-n".to_string());
            argv.push((u64::from(config.parallelism) + 1).to_string());
        }

        if let Some(lib) = &self.engine.library_path {
            argv.push("env".to_string());
            argv.push(format!("LD_LIBRARY_PATH={lib}"));
        }

        argv.push(self.engine.binary.clone());
        argv.push(format!("--runner={}", self.engine.runner));
        argv.extend(engine_flags(config));
        argv
    }

    /// Cluster-shell command line running `remote` on the hosts of
    /// `hostfile`. Each `{hostfile}` in the shell prefix is replaced by it.
    pub fn cluster_argv(&self, hostfile: &str, remote: &str) -> Vec<String> {
        let mut argv: Vec<String> = self
            .shell
            .iter()
            .map(|arg| arg.replace(HOSTFILE_PLACEHOLDER, hostfile))
            .collect();
        argv.push(remote.to_string());
        argv
    }
}
