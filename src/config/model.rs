// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

use crate::types::{CheckpointStorageMode, ScenarioKind};

/// Sweep file exactly as deserialized from TOML, before validation.
///
/// ```toml
/// [sweep]
/// checkpoint_write_dir = "/scratch/checkpoints"
/// checkpoint_read_dir = "/scratch/cp-union/checkpoints"
/// parallelism = [1, 2, 4]
///
/// [engine]
/// launcher = "/opt/mpi/bin/mpirun"
///
/// [[scenario]]
/// kind = "size-scaling"
///
/// [[scenario]]
/// kind = "checkpoint-fault"
/// graph_size = 100
/// parallelism = 16
/// ```
///
/// All sections except `[[scenario]]` are optional and have defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawSweepFile {
    #[serde(default)]
    pub sweep: SweepConfiguration,

    #[serde(default)]
    pub engine: EngineSection,

    #[serde(default)]
    pub cluster: ClusterSection,

    #[serde(default)]
    pub fault: FaultSection,

    /// Scenarios in the order they should run.
    #[serde(default)]
    pub scenario: Vec<ScenarioEntry>,
}

/// Validated sweep file. Only obtainable through `TryFrom<RawSweepFile>`.
#[derive(Debug, Clone)]
pub struct SweepFile {
    pub sweep: SweepConfiguration,
    pub engine: EngineSection,
    pub cluster: ClusterSection,
    pub fault: FaultSection,
    pub scenario: Vec<ScenarioEntry>,
}

impl SweepFile {
    pub(crate) fn new_unchecked(raw: RawSweepFile) -> Self {
        Self {
            sweep: raw.sweep,
            engine: raw.engine,
            cluster: raw.cluster,
            fault: raw.fault,
            scenario: raw.scenario,
        }
    }
}

/// `[sweep]` section: the values the sweep controller is constructed with.
#[derive(Debug, Clone, Deserialize)]
pub struct SweepConfiguration {
    /// Root under which each run persists checkpoints (`{root}/{size}M`).
    #[serde(default = "default_checkpoint_write_dir")]
    pub checkpoint_write_dir: PathBuf,

    /// Root from which runs restore checkpoints (`{root}/{size}M`).
    ///
    /// Must differ from `checkpoint_write_dir`.
    #[serde(default = "default_checkpoint_read_dir")]
    pub checkpoint_read_dir: PathBuf,

    /// Millions of vertices per unit of parallelism in size-scaling sweeps.
    #[serde(default = "default_scaled_base_size")]
    pub scaled_base_size: u32,

    /// Millions of vertices used by time-scaling sweeps.
    #[serde(default = "default_fixed_base_size")]
    pub fixed_base_size: u32,

    #[serde(default = "default_shard_count")]
    pub shard_count: u32,

    /// Scale factors visited by sweeping scenarios, in order.
    #[serde(default = "default_parallelism")]
    pub parallelism: Vec<u32>,

    /// Graph data lives at `{graph_root}/{size}M/pr`.
    #[serde(default = "default_graph_root")]
    pub graph_root: PathBuf,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

fn default_checkpoint_write_dir() -> PathBuf {
    PathBuf::from("/scratch/checkpoints")
}

fn default_checkpoint_read_dir() -> PathBuf {
    PathBuf::from("/scratch/cp-union/checkpoints")
}

fn default_scaled_base_size() -> u32 {
    10
}

fn default_fixed_base_size() -> u32 {
    100
}

fn default_shard_count() -> u32 {
    512
}

fn default_parallelism() -> Vec<u32> {
    vec![1, 2, 4, 8, 16, 32, 64]
}

fn default_graph_root() -> PathBuf {
    PathBuf::from("/scratch/pagerank_test")
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Default for SweepConfiguration {
    fn default() -> Self {
        Self {
            checkpoint_write_dir: default_checkpoint_write_dir(),
            checkpoint_read_dir: default_checkpoint_read_dir(),
            scaled_base_size: default_scaled_base_size(),
            fixed_base_size: default_fixed_base_size(),
            shard_count: default_shard_count(),
            parallelism: default_parallelism(),
            graph_root: default_graph_root(),
            log_dir: default_log_dir(),
        }
    }
}

/// `[engine]` section: how the distributed engine is launched.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    /// Process launcher (an `mpirun`-compatible binary).
    #[serde(default = "default_launcher")]
    pub launcher: String,

    /// Engine binary, run on every host by the launcher.
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Value of `--runner=`; also the prefix of every log name.
    #[serde(default = "default_runner")]
    pub runner: String,

    /// Exported as `LD_LIBRARY_PATH` for the engine when set.
    #[serde(default)]
    pub library_path: Option<String>,

    /// Artificial per-step delay in seconds, widening the fault window.
    #[serde(default = "default_sleep_time")]
    pub sleep_time: f64,

    /// Work stealing setting for timed runs unless a scenario overrides it.
    #[serde(default = "default_work_stealing")]
    pub work_stealing: bool,
}

fn default_launcher() -> String {
    "mpirun".to_string()
}

fn default_binary() -> String {
    "bin/release/examples/example-dsm".to_string()
}

fn default_runner() -> String {
    "Pagerank".to_string()
}

fn default_sleep_time() -> f64 {
    0.001
}

fn default_work_stealing() -> bool {
    true
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            launcher: default_launcher(),
            binary: default_binary(),
            runner: default_runner(),
            library_path: None,
            sleep_time: default_sleep_time(),
            work_stealing: default_work_stealing(),
        }
    }
}

/// `[cluster]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterSection {
    /// Hostfile used when a scenario does not name its own.
    #[serde(default = "default_hostfile")]
    pub hostfile: String,

    /// Cluster-shell prefix; the remote command is appended as one argument.
    ///
    /// `{hostfile}` anywhere in an argument is replaced by the hostfile of
    /// the run being prepared, e.g. `["pdsh", "-w", "^{hostfile}"]`. Without
    /// it the prefix addresses a fixed host group, as the default
    /// (`pdsh -f20 -g muppets`) does.
    #[serde(default = "default_shell")]
    pub shell: Vec<String>,

    #[serde(default)]
    pub checkpoint_storage: CheckpointStorageMode,
}

fn default_hostfile() -> String {
    "fast_hostfile".to_string()
}

fn default_shell() -> Vec<String> {
    ["pdsh", "-f20", "-g", "muppets"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ClusterSection {
    fn default() -> Self {
        Self {
            hostfile: default_hostfile(),
            shell: default_shell(),
            checkpoint_storage: CheckpointStorageMode::default(),
        }
    }
}

/// `[fault]` section, used by `checkpoint-fault` scenarios.
#[derive(Debug, Clone, Deserialize)]
pub struct FaultSection {
    #[serde(default = "default_delay_seconds")]
    pub delay_seconds: f64,

    /// Worker ids the restore run treats as failed.
    #[serde(default = "default_dead_workers")]
    pub dead_workers: Vec<u32>,

    /// Command issued once the delay elapses.
    #[serde(default = "default_kill_command")]
    pub kill_command: Vec<String>,
}

fn default_delay_seconds() -> f64 {
    120.0
}

fn default_dead_workers() -> Vec<u32> {
    vec![5, 6, 10]
}

fn default_kill_command() -> Vec<String> {
    vec!["pkill".to_string(), "mpirun".to_string()]
}

impl Default for FaultSection {
    fn default() -> Self {
        Self {
            delay_seconds: default_delay_seconds(),
            dead_workers: default_dead_workers(),
            kill_command: default_kill_command(),
        }
    }
}

/// One `[[scenario]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioEntry {
    pub kind: ScenarioKind,

    /// Graph size in millions of vertices. Required for single-point kinds;
    /// sweeping kinds derive it from the base sizes.
    #[serde(default)]
    pub graph_size: Option<u32>,

    /// Scale factor for single-point kinds.
    #[serde(default)]
    pub parallelism: Option<u32>,

    /// Overrides `[cluster].hostfile` for this scenario.
    #[serde(default)]
    pub hostfile: Option<String>,

    /// Overrides the `{runner}.{suffix}` log name.
    #[serde(default)]
    pub log_name: Option<String>,
}

impl ScenarioEntry {
    pub fn new(kind: ScenarioKind) -> Self {
        Self {
            kind,
            graph_size: None,
            parallelism: None,
            hostfile: None,
            log_name: None,
        }
    }
}
