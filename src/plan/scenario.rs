// src/plan/scenario.rs

//! Scenario resolution and parameter-point enumeration.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::config::{FaultSection, ScenarioEntry, SweepConfiguration, SweepFile};
use crate::errors::{Result, SweepError};
use crate::types::ScenarioKind;

use super::Overrides;

/// A scenario with every default resolved: which hostfile it runs on and
/// what its logs are called. Immutable for the duration of a sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioSpec {
    pub kind: ScenarioKind,
    /// Explicit size for single-point scenarios (millions of vertices).
    pub graph_size: Option<u32>,
    /// Explicit scale factor for single-point scenarios.
    pub parallelism: Option<u32>,
    pub hostfile: String,
    /// Log name without the per-point parallelism suffix.
    pub log_name: String,
}

/// When to kill the checkpointed run and who is dead on restore.
#[derive(Debug, Clone, PartialEq)]
pub struct FaultPlan {
    pub delay: Duration,
    pub dead_worker_ids: BTreeSet<u32>,
    pub kill_command: Vec<String>,
}

impl FaultPlan {
    pub fn from_section(fault: &FaultSection) -> Self {
        Self {
            delay: Duration::try_from_secs_f64(fault.delay_seconds).unwrap_or(Duration::ZERO),
            dead_worker_ids: fault.dead_workers.iter().copied().collect(),
            kill_command: fault.kill_command.clone(),
        }
    }
}

/// One concrete (graph size, scale, flags) combination within a scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterPoint {
    pub graph_size: u32,
    pub parallelism: u32,
    /// Whether the graph must be built before the run.
    pub provision: bool,
    pub log_name: String,
    pub overrides: Overrides,
    pub fault: Option<FaultPlan>,
}

impl ScenarioSpec {
    pub fn new(kind: ScenarioKind, hostfile: impl Into<String>, log_name: impl Into<String>) -> Self {
        Self {
            kind,
            graph_size: None,
            parallelism: None,
            hostfile: hostfile.into(),
            log_name: log_name.into(),
        }
    }

    /// Single-point scenario at an explicit size and scale.
    pub fn at(mut self, graph_size: u32, parallelism: u32) -> Self {
        self.graph_size = Some(graph_size);
        self.parallelism = Some(parallelism);
        self
    }

    /// Resolve a `[[scenario]]` entry against the sweep file defaults.
    pub fn from_entry(entry: &ScenarioEntry, file: &SweepFile) -> Self {
        let hostfile = entry
            .hostfile
            .clone()
            .unwrap_or_else(|| file.cluster.hostfile.clone());
        let log_name = entry
            .log_name
            .clone()
            .unwrap_or_else(|| format!("{}.{}", file.engine.runner, entry.kind.log_suffix()));
        Self {
            kind: entry.kind,
            graph_size: entry.graph_size,
            parallelism: entry.parallelism,
            hostfile,
            log_name,
        }
    }

    /// All scenarios of a sweep file, in file order.
    pub fn all_from_file(file: &SweepFile) -> Vec<Self> {
        file.scenario
            .iter()
            .map(|entry| Self::from_entry(entry, file))
            .collect()
    }

    /// Log name of the restore run that follows a fault.
    ///
    /// `X.checkpoint_fault` becomes `X.restore_fault`; any other name gets a
    /// `.restore` suffix.
    pub fn restore_log_name(&self) -> String {
        match self.log_name.strip_suffix(".checkpoint_fault") {
            Some(stem) => format!("{stem}.restore_fault"),
            None => format!("{}.restore", self.log_name),
        }
    }

    /// Scenario-specific defaults layered over the engine settings.
    pub fn overrides(&self) -> Overrides {
        match self.kind {
            ScenarioKind::SizeScaling | ScenarioKind::TimeScaling => Overrides {
                checkpoint_enabled: Some(false),
                ..Overrides::default()
            },
            ScenarioKind::WorkStealing => Overrides {
                checkpoint_enabled: Some(false),
                work_stealing: Some(true),
                ..Overrides::default()
            },
            ScenarioKind::CheckpointFault => Overrides {
                checkpoint_enabled: Some(true),
                ..Overrides::default()
            },
            ScenarioKind::ClusterElastic => Overrides {
                checkpoint_enabled: Some(false),
                extra_flags: vec!["--memory_graph=true".to_string()],
                ..Overrides::default()
            },
        }
    }

    fn provisions(&self) -> bool {
        matches!(
            self.kind,
            ScenarioKind::SizeScaling | ScenarioKind::TimeScaling | ScenarioKind::WorkStealing
        )
    }

    /// Scale factors of the scenario in execution order.
    ///
    /// Sweeping scenarios visit `sweep.parallelism` ascending, without
    /// repeats; single-point scenarios yield their explicit parallelism. Fails
    /// only when a single-point scenario lacks its explicit values.
    pub fn scales(&self, sweep: &SweepConfiguration) -> Result<Vec<u32>> {
        if self.kind.is_sweep() {
            let mut scales = sweep.parallelism.clone();
            scales.sort_unstable();
            scales.dedup();
            return Ok(scales);
        }
        match (self.graph_size, self.parallelism) {
            (Some(_), Some(n)) => Ok(vec![n]),
            _ => Err(SweepError::InvalidParameter(format!(
                "{} scenario needs an explicit graph_size and parallelism",
                self.kind
            ))),
        }
    }

    /// Log name of the run at `parallelism`.
    pub fn point_log_name(&self, parallelism: u32) -> String {
        format!("{}.{}", self.log_name, parallelism)
    }

    /// The parameter point at `parallelism`.
    ///
    /// Errors describe this point only; other scales of the same scenario may
    /// still be valid.
    pub fn point(
        &self,
        parallelism: u32,
        sweep: &SweepConfiguration,
        fault: &FaultSection,
    ) -> Result<ParameterPoint> {
        let graph_size = match self.kind {
            ScenarioKind::TimeScaling => sweep.fixed_base_size,
            ScenarioKind::SizeScaling | ScenarioKind::ClusterElastic => sweep
                .scaled_base_size
                .checked_mul(parallelism)
                .ok_or_else(|| {
                    SweepError::InvalidParameter(format!(
                        "graph size {} * {parallelism} overflows",
                        sweep.scaled_base_size
                    ))
                })?,
            ScenarioKind::WorkStealing | ScenarioKind::CheckpointFault => {
                self.graph_size.ok_or_else(|| {
                    SweepError::InvalidParameter(format!(
                        "{} scenario needs an explicit graph_size",
                        self.kind
                    ))
                })?
            }
        };

        Ok(ParameterPoint {
            graph_size,
            parallelism,
            provision: self.provisions(),
            log_name: self.point_log_name(parallelism),
            overrides: self.overrides(),
            fault: (self.kind == ScenarioKind::CheckpointFault)
                .then(|| FaultPlan::from_section(fault)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sweep(parallelism: Vec<u32>) -> SweepConfiguration {
        SweepConfiguration {
            parallelism,
            ..SweepConfiguration::default()
        }
    }

    fn all_points(spec: &ScenarioSpec, sweep: &SweepConfiguration) -> Vec<ParameterPoint> {
        spec.scales(sweep)
            .unwrap()
            .into_iter()
            .map(|n| spec.point(n, sweep, &FaultSection::default()).unwrap())
            .collect()
    }

    #[test]
    fn size_scaling_scales_graph_with_parallelism() {
        let spec = ScenarioSpec::new(ScenarioKind::SizeScaling, "fast_hostfile", "Pagerank.scaled_size");
        let points = all_points(&spec, &sweep(vec![4, 1, 2, 2]));

        let sizes: Vec<u32> = points.iter().map(|p| p.graph_size).collect();
        assert_eq!(sizes, vec![10, 20, 40]);
        assert!(points.iter().all(|p| p.provision && p.fault.is_none()));
        assert_eq!(points[2].log_name, "Pagerank.scaled_size.4");
    }

    #[test]
    fn time_scaling_keeps_size_fixed() {
        let spec = ScenarioSpec::new(ScenarioKind::TimeScaling, "fast_hostfile", "Pagerank.fixed_size");
        let points = all_points(&spec, &sweep(vec![1, 8, 64]));
        assert!(points.iter().all(|p| p.graph_size == 100));
        assert_eq!(
            points.iter().map(|p| p.parallelism).collect::<Vec<_>>(),
            vec![1, 8, 64]
        );
    }

    #[test]
    fn elastic_runs_from_memory_without_provisioning() {
        let spec = ScenarioSpec::new(ScenarioKind::ClusterElastic, "ec2_hostfile", "Pagerank.ec2");
        let points = all_points(&spec, &sweep(vec![2]));
        assert_eq!(points.len(), 1);
        assert!(!points[0].provision);
        assert_eq!(points[0].overrides.extra_flags, vec!["--memory_graph=true"]);
    }

    #[test]
    fn single_point_scenarios_need_explicit_size() {
        let spec = ScenarioSpec::new(ScenarioKind::WorkStealing, "slow_hostfile", "Pagerank.with_stealing");
        assert!(spec.scales(&sweep(vec![1])).is_err());

        let points = all_points(&spec.at(100, 16), &sweep(vec![1, 2]));
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].graph_size, 100);
        assert_eq!(points[0].overrides.work_stealing, Some(true));
    }

    #[test]
    fn checkpoint_fault_point_carries_fault_plan() {
        let spec = ScenarioSpec::new(
            ScenarioKind::CheckpointFault,
            "fast_hostfile",
            "Pagerank.checkpoint_fault",
        )
        .at(100, 16);
        let points = all_points(&spec, &sweep(vec![1]));
        let plan = points[0].fault.as_ref().unwrap();

        assert_eq!(plan.delay, Duration::from_secs(120));
        assert_eq!(plan.dead_worker_ids, BTreeSet::from([5, 6, 10]));
        assert!(!points[0].provision);
        assert_eq!(points[0].overrides.checkpoint_enabled, Some(true));
        assert_eq!(spec.restore_log_name(), "Pagerank.restore_fault");
    }

    #[test]
    fn oversized_point_does_not_taint_its_neighbours() {
        let spec = ScenarioSpec::new(ScenarioKind::SizeScaling, "h", "x");
        let mut cfg = sweep(vec![500_000_000, 1, 2]);
        cfg.scaled_base_size = 10;

        assert_eq!(spec.scales(&cfg).unwrap(), vec![1, 2, 500_000_000]);
        assert_eq!(spec.point(2, &cfg, &FaultSection::default()).unwrap().graph_size, 20);
        assert!(matches!(
            spec.point(500_000_000, &cfg, &FaultSection::default()),
            Err(SweepError::InvalidParameter(_))
        ));
        assert_eq!(spec.point_log_name(500_000_000), "x.500000000");
    }
}
