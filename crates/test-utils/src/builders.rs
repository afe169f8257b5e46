#![allow(dead_code)]

use std::path::{Path, PathBuf};

use shardsweep::config::{
    ClusterSection, EngineSection, FaultSection, RawSweepFile, ScenarioEntry, SweepConfiguration,
    SweepFile,
};
use shardsweep::types::{CheckpointStorageMode, ScenarioKind};

/// Builder for `SweepFile` to simplify test setup.
///
/// Starts from the defaults with checkpoint roots under `/ckpt` and a
/// zero-delay fault so tests never sleep.
pub struct SweepFileBuilder {
    raw: RawSweepFile,
}

impl SweepFileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawSweepFile {
                sweep: SweepConfiguration {
                    checkpoint_write_dir: PathBuf::from("/ckpt/write"),
                    checkpoint_read_dir: PathBuf::from("/ckpt/read"),
                    log_dir: PathBuf::from("/logs"),
                    ..SweepConfiguration::default()
                },
                engine: EngineSection {
                    launcher: "mpirun".to_string(),
                    ..EngineSection::default()
                },
                cluster: ClusterSection::default(),
                fault: FaultSection {
                    delay_seconds: 0.0,
                    ..FaultSection::default()
                },
                scenario: Vec::new(),
            },
        }
    }

    pub fn parallelism(mut self, values: &[u32]) -> Self {
        self.raw.sweep.parallelism = values.to_vec();
        self
    }

    pub fn scaled_base_size(mut self, size: u32) -> Self {
        self.raw.sweep.scaled_base_size = size;
        self
    }

    pub fn fixed_base_size(mut self, size: u32) -> Self {
        self.raw.sweep.fixed_base_size = size;
        self
    }

    pub fn shard_count(mut self, shards: u32) -> Self {
        self.raw.sweep.shard_count = shards;
        self
    }

    pub fn checkpoint_dirs(mut self, write: impl AsRef<Path>, read: impl AsRef<Path>) -> Self {
        self.raw.sweep.checkpoint_write_dir = write.as_ref().to_path_buf();
        self.raw.sweep.checkpoint_read_dir = read.as_ref().to_path_buf();
        self
    }

    pub fn log_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.raw.sweep.log_dir = dir.as_ref().to_path_buf();
        self
    }

    pub fn local_checkpoints(mut self) -> Self {
        self.raw.cluster.checkpoint_storage = CheckpointStorageMode::Local;
        self
    }

    pub fn cluster_shell(mut self, shell: &[&str]) -> Self {
        self.raw.cluster.shell = shell.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn fault_delay(mut self, seconds: f64) -> Self {
        self.raw.fault.delay_seconds = seconds;
        self
    }

    pub fn dead_workers(mut self, ids: &[u32]) -> Self {
        self.raw.fault.dead_workers = ids.to_vec();
        self
    }

    pub fn scenario(mut self, kind: ScenarioKind) -> Self {
        self.raw.scenario.push(ScenarioEntry::new(kind));
        self
    }

    /// Single-point scenario at an explicit size and scale.
    pub fn scenario_at(mut self, kind: ScenarioKind, graph_size: u32, parallelism: u32) -> Self {
        let mut entry = ScenarioEntry::new(kind);
        entry.graph_size = Some(graph_size);
        entry.parallelism = Some(parallelism);
        self.raw.scenario.push(entry);
        self
    }

    pub fn scenario_entry(mut self, entry: ScenarioEntry) -> Self {
        self.raw.scenario.push(entry);
        self
    }

    pub fn build(self) -> SweepFile {
        SweepFile::try_from(self.raw).expect("Failed to build valid sweep file from builder")
    }
}

impl Default for SweepFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
