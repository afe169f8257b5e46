// src/plan/mod.rs

//! Pure planning: everything between the sweep file and a concrete command
//! line, with no IO.
//!
//! - [`builder`] turns (scenario, graph size, shard count, overrides) into a
//!   fully resolved [`ExperimentConfig`].
//! - [`command`] maps a config to the launcher argument list.
//! - [`scenario`] enumerates the parameter points of each scenario.

pub mod builder;
pub mod command;
pub mod scenario;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub use builder::{ConfigBuilder, MAX_PARALLELISM, iteration_count};
pub use command::{CommandBuilder, engine_flags};
pub use scenario::{FaultPlan, ParameterPoint, ScenarioSpec};

/// Graph construction or a timed computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    BuildGraph,
    Compute,
}

/// Scenario-level adjustments applied on top of the engine defaults.
///
/// There is deliberately no way to touch the iteration count here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub work_stealing: Option<bool>,
    pub checkpoint_enabled: Option<bool>,
    pub extra_flags: Vec<String>,
}

/// A complete, engine-ready description of one invocation.
///
/// Built only by [`ConfigBuilder`] (or derived from another config for a
/// restore) and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentConfig {
    pub(crate) mode: RunMode,
    pub(crate) graph_size_millions: u32,
    pub(crate) shard_count: u32,
    pub(crate) parallelism: u32,
    pub(crate) iteration_count: u32,
    pub(crate) work_stealing: bool,
    pub(crate) checkpoint_enabled: bool,
    pub(crate) checkpoint_write_path: PathBuf,
    pub(crate) checkpoint_read_path: PathBuf,
    pub(crate) graph_path_prefix: PathBuf,
    pub(crate) hostfile: String,
    pub(crate) sleep_time: f64,
    pub(crate) dead_workers: BTreeSet<u32>,
    pub(crate) extra_flags: Vec<String>,
}

impl ExperimentConfig {
    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn graph_size_millions(&self) -> u32 {
        self.graph_size_millions
    }

    /// Total vertex count handed to the engine.
    pub fn node_count(&self) -> u64 {
        u64::from(self.graph_size_millions) * 1_000_000
    }

    pub fn shard_count(&self) -> u32 {
        self.shard_count
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub fn iteration_count(&self) -> u32 {
        self.iteration_count
    }

    pub fn work_stealing(&self) -> bool {
        self.work_stealing
    }

    pub fn checkpoint_enabled(&self) -> bool {
        self.checkpoint_enabled
    }

    pub fn checkpoint_write_path(&self) -> &Path {
        &self.checkpoint_write_path
    }

    pub fn checkpoint_read_path(&self) -> &Path {
        &self.checkpoint_read_path
    }

    pub fn graph_path_prefix(&self) -> &Path {
        &self.graph_path_prefix
    }

    pub fn hostfile(&self) -> &str {
        &self.hostfile
    }

    pub fn sleep_time(&self) -> f64 {
        self.sleep_time
    }

    pub fn dead_workers(&self) -> &BTreeSet<u32> {
        &self.dead_workers
    }

    pub fn extra_flags(&self) -> &[String] {
        &self.extra_flags
    }

    /// A new config that restores from this one's checkpoints.
    ///
    /// The read side becomes this config's write path; the restore persists
    /// into `restore_write_path`, checkpointing is forced on and the given
    /// workers are reported dead.
    pub fn for_restore(
        &self,
        restore_write_path: PathBuf,
        dead_workers: impl IntoIterator<Item = u32>,
    ) -> ExperimentConfig {
        ExperimentConfig {
            mode: RunMode::Compute,
            checkpoint_enabled: true,
            checkpoint_read_path: self.checkpoint_write_path.clone(),
            checkpoint_write_path: restore_write_path,
            dead_workers: dead_workers.into_iter().collect(),
            ..self.clone()
        }
    }
}
