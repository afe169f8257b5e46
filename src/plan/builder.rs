// src/plan/builder.rs

//! Config builder: the only place an [`ExperimentConfig`] is assembled.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::checkpoint::CheckpointLayout;
use crate::checkpoint::layout::size_dir;
use crate::config::SweepFile;
use crate::errors::{Result, SweepError};

use super::{ExperimentConfig, Overrides, RunMode, ScenarioSpec};

/// Minimum number of iterations for a timed run.
pub const MIN_ITERATIONS: u32 = 5;

/// Largest scale factor a timed run may use. The launcher is asked for
/// `parallelism + 1` processes (workers plus master), which must stay in range.
pub const MAX_PARALLELISM: u32 = 1 << 16;

/// `max(5, parallelism / 4)`: larger clusters run longer, tiny ones still do
/// a meaningful amount of work.
pub fn iteration_count(parallelism: u32) -> u32 {
    (parallelism / 4).max(MIN_ITERATIONS)
}

/// Flags whose value is owned by the builder and may not be smuggled in via
/// `extra_flags`.
const RESERVED_FLAGS: &[&str] = &[
    "--iterations",
    "--build_graph",
    "--nodes",
    "--shards",
    "--graph_prefix",
    "--checkpoint_write_dir",
    "--checkpoint_read_dir",
    "--checkpoint",
    "--work_stealing",
    "--dead_workers",
    "--sleep_time",
];

#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    layout: CheckpointLayout,
    graph_root: PathBuf,
    sleep_time: f64,
    work_stealing: bool,
}

impl ConfigBuilder {
    pub fn new(
        layout: CheckpointLayout,
        graph_root: impl Into<PathBuf>,
        sleep_time: f64,
        work_stealing: bool,
    ) -> Self {
        Self {
            layout,
            graph_root: graph_root.into(),
            sleep_time,
            work_stealing,
        }
    }

    pub fn from_file(file: &SweepFile) -> Self {
        Self::new(
            CheckpointLayout::new(
                &file.sweep.checkpoint_write_dir,
                &file.sweep.checkpoint_read_dir,
            ),
            &file.sweep.graph_root,
            file.engine.sleep_time,
            file.engine.work_stealing,
        )
    }

    pub fn layout(&self) -> &CheckpointLayout {
        &self.layout
    }

    /// `{graph_root}/{size}M/pr`
    pub fn graph_prefix(&self, graph_size: u32) -> PathBuf {
        self.graph_root.join(size_dir(graph_size)).join("pr")
    }

    /// Config for one timed run of `scenario` at the given scale.
    pub fn build(
        &self,
        scenario: &ScenarioSpec,
        graph_size: u32,
        shard_count: u32,
        parallelism: u32,
        overrides: &Overrides,
    ) -> Result<ExperimentConfig> {
        ensure_positive("graph_size", graph_size)?;
        ensure_positive("shard_count", shard_count)?;
        ensure_positive("parallelism", parallelism)?;
        if parallelism > MAX_PARALLELISM {
            return Err(SweepError::InvalidParameter(format!(
                "parallelism {parallelism} exceeds the maximum of {MAX_PARALLELISM}"
            )));
        }
        check_extra_flags(&overrides.extra_flags)?;

        Ok(ExperimentConfig {
            mode: RunMode::Compute,
            graph_size_millions: graph_size,
            shard_count,
            parallelism,
            iteration_count: iteration_count(parallelism),
            work_stealing: overrides.work_stealing.unwrap_or(self.work_stealing),
            checkpoint_enabled: overrides.checkpoint_enabled.unwrap_or(false),
            checkpoint_write_path: self.layout.write_path(graph_size),
            checkpoint_read_path: self.layout.read_path(graph_size),
            graph_path_prefix: self.graph_prefix(graph_size),
            hostfile: scenario.hostfile.clone(),
            sleep_time: self.sleep_time,
            dead_workers: BTreeSet::new(),
            extra_flags: overrides.extra_flags.clone(),
        })
    }

    /// Config for the one-shot graph construction job: zero iterations, no
    /// work stealing, no checkpointing.
    pub fn build_graph(
        &self,
        graph_size: u32,
        shard_count: u32,
        hostfile: &str,
    ) -> Result<ExperimentConfig> {
        ensure_positive("graph_size", graph_size)?;
        ensure_positive("shard_count", shard_count)?;

        Ok(ExperimentConfig {
            mode: RunMode::BuildGraph,
            graph_size_millions: graph_size,
            shard_count,
            parallelism: 0,
            iteration_count: 0,
            work_stealing: false,
            checkpoint_enabled: false,
            checkpoint_write_path: self.layout.write_path(graph_size),
            checkpoint_read_path: self.layout.read_path(graph_size),
            graph_path_prefix: self.graph_prefix(graph_size),
            hostfile: hostfile.to_string(),
            sleep_time: 0.0,
            dead_workers: BTreeSet::new(),
            extra_flags: Vec::new(),
        })
    }
}

fn ensure_positive(name: &str, value: u32) -> Result<()> {
    if value == 0 {
        return Err(SweepError::InvalidParameter(format!(
            "{name} must be positive (got 0)"
        )));
    }
    Ok(())
}

fn check_extra_flags(flags: &[String]) -> Result<()> {
    for flag in flags {
        let name = flag.split('=').next().unwrap_or(flag);
        if RESERVED_FLAGS.contains(&name) {
            return Err(SweepError::InvalidParameter(format!(
                "extra flag {flag:?} would override a value managed by the config builder"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScenarioKind;

    fn builder() -> ConfigBuilder {
        ConfigBuilder::new(
            CheckpointLayout::new("/ckpt/w", "/ckpt/r"),
            "/scratch/pagerank_test",
            0.001,
            true,
        )
    }

    fn scenario() -> ScenarioSpec {
        ScenarioSpec::new(ScenarioKind::SizeScaling, "fast_hostfile", "Pagerank.scaled_size")
    }

    #[test]
    fn iteration_floor_is_five() {
        assert_eq!(iteration_count(1), 5);
        assert_eq!(iteration_count(20), 5);
        assert_eq!(iteration_count(23), 5);
        assert_eq!(iteration_count(24), 6);
        assert_eq!(iteration_count(64), 16);
    }

    #[test]
    fn build_resolves_everything() {
        let overrides = Overrides {
            checkpoint_enabled: Some(false),
            ..Overrides::default()
        };
        let cfg = builder()
            .build(&scenario(), 40, 512, 4, &overrides)
            .unwrap();

        assert_eq!(cfg.mode(), RunMode::Compute);
        assert_eq!(cfg.node_count(), 40_000_000);
        assert_eq!(cfg.iteration_count(), 5);
        assert!(cfg.work_stealing());
        assert!(!cfg.checkpoint_enabled());
        assert_eq!(cfg.checkpoint_write_path(), std::path::Path::new("/ckpt/w/40M"));
        assert_eq!(cfg.checkpoint_read_path(), std::path::Path::new("/ckpt/r/40M"));
        assert_eq!(
            cfg.graph_path_prefix(),
            std::path::Path::new("/scratch/pagerank_test/40M/pr")
        );
        assert_eq!(cfg.hostfile(), "fast_hostfile");
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let b = builder();
        assert!(matches!(
            b.build(&scenario(), 0, 512, 1, &Overrides::default()),
            Err(SweepError::InvalidParameter(_))
        ));
        assert!(b.build(&scenario(), 10, 0, 1, &Overrides::default()).is_err());
        assert!(b.build_graph(10, 0, "fast_hostfile").is_err());
    }

    #[test]
    fn parallelism_beyond_ceiling_is_rejected() {
        let b = builder();
        assert!(b
            .build(&scenario(), 10, 512, MAX_PARALLELISM, &Overrides::default())
            .is_ok());
        let err = b
            .build(&scenario(), 10, 512, u32::MAX, &Overrides::default())
            .unwrap_err();
        assert!(matches!(err, SweepError::InvalidParameter(_)));
        assert!(err.to_string().contains("exceeds the maximum"));
    }

    #[test]
    fn extra_flags_cannot_change_iterations() {
        let overrides = Overrides {
            extra_flags: vec!["--iterations=100".to_string()],
            ..Overrides::default()
        };
        let err = builder()
            .build(&scenario(), 10, 512, 1, &overrides)
            .unwrap_err();
        assert!(err.to_string().contains("--iterations"));
    }

    #[test]
    fn graph_build_config_has_no_iterations_or_stealing() {
        let cfg = builder().build_graph(100, 512, "slow_hostfile").unwrap();
        assert_eq!(cfg.mode(), RunMode::BuildGraph);
        assert_eq!(cfg.iteration_count(), 0);
        assert!(!cfg.work_stealing());
        assert_eq!(cfg.hostfile(), "slow_hostfile");
    }

    #[test]
    fn restore_reads_from_base_write_path() {
        let b = builder();
        let base = b
            .build(
                &scenario(),
                100,
                512,
                16,
                &Overrides {
                    checkpoint_enabled: Some(true),
                    ..Overrides::default()
                },
            )
            .unwrap();
        let restore = base.for_restore(b.layout().restore_write_path(100), [10, 5, 6]);

        assert_eq!(restore.checkpoint_read_path(), base.checkpoint_write_path());
        assert_ne!(restore.checkpoint_write_path(), restore.checkpoint_read_path());
        assert!(restore.checkpoint_enabled());
        assert_eq!(
            restore.dead_workers().iter().copied().collect::<Vec<_>>(),
            vec![5, 6, 10]
        );
        assert_eq!(restore.iteration_count(), base.iteration_count());
    }
}
