// src/sweep/controller.rs

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{Instrument, debug, error, field, info, info_span, warn};

use crate::checkpoint::{
    CheckpointLayout, CheckpointManager, CheckpointStorage, ClusterStorage, LocalStorage,
};
use crate::config::{FaultSection, SweepConfiguration, SweepFile};
use crate::errors::Result;
use crate::exec::ExecutorBackend;
use crate::fs::RealFileSystem;
use crate::plan::{CommandBuilder, ConfigBuilder, ExperimentConfig, ParameterPoint, ScenarioSpec};
use crate::run::{FaultInjector, GraphProvisioner, RunOrchestrator, RunRecord};
use crate::types::{CheckpointStorageMode, ScenarioKind};

/// Graphs already built during the current scenario: (size, shards, hostfile).
type ProvisionedSet = HashSet<(u32, u32, String)>;

/// A scale factor with its point and config, or why the point cannot run.
type PointPlan = (u32, Result<(ParameterPoint, ExperimentConfig)>);

/// Everything a dry run shows for one parameter point.
#[derive(Debug, Clone)]
pub struct PlannedRun {
    pub scenario: ScenarioKind,
    pub parallelism: u32,
    pub log_name: String,
    /// `Err` carries the reason the point would be skipped.
    pub commands: std::result::Result<PlannedCommands, String>,
}

#[derive(Debug, Clone)]
pub struct PlannedCommands {
    pub config: ExperimentConfig,
    pub provision_argv: Option<Vec<String>>,
    pub launch_argv: Vec<String>,
    /// Restore log name and command line, for fault scenarios.
    pub restore: Option<(String, Vec<String>)>,
}

pub struct SweepController {
    sweep: SweepConfiguration,
    fault: FaultSection,
    builder: ConfigBuilder,
    commands: CommandBuilder,
    checkpoints: CheckpointManager,
    provisioner: GraphProvisioner,
    orchestrator: RunOrchestrator,
    injector: FaultInjector,
}

impl SweepController {
    /// Controller whose checkpoint storage follows `[cluster].checkpoint_storage`.
    pub fn new(file: &SweepFile, backend: Arc<dyn ExecutorBackend>) -> Self {
        let storage: Box<dyn CheckpointStorage> = match file.cluster.checkpoint_storage {
            CheckpointStorageMode::Cluster => Box::new(ClusterStorage::new(
                CommandBuilder::from_file(file),
                Arc::clone(&backend),
            )),
            CheckpointStorageMode::Local => {
                Box::new(LocalStorage::new(Arc::new(RealFileSystem)))
            }
        };
        Self::with_storage(file, backend, storage)
    }

    pub fn with_storage(
        file: &SweepFile,
        backend: Arc<dyn ExecutorBackend>,
        storage: Box<dyn CheckpointStorage>,
    ) -> Self {
        let builder = ConfigBuilder::from_file(file);
        let commands = CommandBuilder::from_file(file);
        let layout = CheckpointLayout::new(
            &file.sweep.checkpoint_write_dir,
            &file.sweep.checkpoint_read_dir,
        );

        Self {
            sweep: file.sweep.clone(),
            fault: file.fault.clone(),
            checkpoints: CheckpointManager::new(layout, storage),
            provisioner: GraphProvisioner::new(
                Arc::clone(&backend),
                builder.clone(),
                commands.clone(),
            ),
            orchestrator: RunOrchestrator::new(
                Arc::clone(&backend),
                commands.clone(),
                &file.sweep.log_dir,
            ),
            injector: FaultInjector::new(backend),
            builder,
            commands,
        }
    }

    /// Run every scenario in order and return the records of every point.
    ///
    /// Fault scenarios contribute two records per point (the faulted run and
    /// its restore). A point that cannot be planned yields one `Skipped`
    /// record and its neighbours still run. Never fails: problems surface in
    /// the records and logs.
    pub async fn run(&self, scenarios: &[ScenarioSpec]) -> Vec<RunRecord> {
        let mut records = Vec::new();

        for scenario in scenarios {
            let planned = match self.plan_scenario(scenario) {
                Ok(planned) => planned,
                Err(err) => {
                    error!(scenario = %scenario.kind, error = %err, "cannot plan scenario; skipping it");
                    continue;
                }
            };

            info!(scenario = %scenario.kind, points = planned.len(), "starting scenario");

            let mut provisioned = ProvisionedSet::new();
            for (parallelism, planned) in planned {
                let span = info_span!(
                    "point",
                    scenario = %scenario.kind,
                    parallelism,
                    graph_size = field::Empty
                );
                match planned {
                    Ok((point, config)) => {
                        span.record("graph_size", point.graph_size);
                        let point_records = self
                            .run_point(scenario, &point, config, &mut provisioned)
                            .instrument(span)
                            .await;
                        records.extend(point_records);
                    }
                    Err(err) => {
                        span.in_scope(|| error!(error = %err, "cannot plan point; skipping it"));
                        records.push(RunRecord::unplanned(
                            scenario.kind,
                            parallelism,
                            self.orchestrator
                                .log_path(&scenario.point_log_name(parallelism)),
                            err.to_string(),
                        ));
                    }
                }
            }

            info!(scenario = %scenario.kind, "scenario finished");
        }

        records
    }

    /// Launch commands for every point, without executing anything.
    ///
    /// Points that cannot be planned are listed with the reason instead of
    /// commands.
    pub fn plan(&self, scenarios: &[ScenarioSpec]) -> Vec<PlannedRun> {
        let mut runs = Vec::new();

        for scenario in scenarios {
            let planned = match self.plan_scenario(scenario) {
                Ok(planned) => planned,
                Err(err) => {
                    error!(scenario = %scenario.kind, error = %err, "cannot plan scenario; skipping it");
                    continue;
                }
            };

            let mut provisioned = ProvisionedSet::new();
            for (parallelism, planned) in planned {
                let commands = planned
                    .and_then(|(point, config)| {
                        self.plan_commands(scenario, &point, config, &mut provisioned)
                    })
                    .map_err(|e| e.to_string());
                runs.push(PlannedRun {
                    scenario: scenario.kind,
                    parallelism,
                    log_name: scenario.point_log_name(parallelism),
                    commands,
                });
            }
        }

        runs
    }

    fn plan_commands(
        &self,
        scenario: &ScenarioSpec,
        point: &ParameterPoint,
        config: ExperimentConfig,
        provisioned: &mut ProvisionedSet,
    ) -> Result<PlannedCommands> {
        let provision_argv =
            if point.provision && provisioned.insert(self.provision_key(point, &config)) {
                let build = self.builder.build_graph(
                    point.graph_size,
                    self.sweep.shard_count,
                    config.hostfile(),
                )?;
                Some(self.commands.launch_argv(&build))
            } else {
                None
            };

        let restore = point.fault.as_ref().map(|plan| {
            let restore = config.for_restore(
                self.checkpoints.layout().restore_write_path(point.graph_size),
                plan.dead_worker_ids.iter().copied(),
            );
            (
                self.restore_log_name(scenario, point),
                self.commands.launch_argv(&restore),
            )
        });

        Ok(PlannedCommands {
            launch_argv: self.commands.launch_argv(&config),
            config,
            provision_argv,
            restore,
        })
    }

    /// Scale factors of `scenario`, each with its planned point or the
    /// reason it cannot run. Fails only if the scenario itself is unusable.
    fn plan_scenario(&self, scenario: &ScenarioSpec) -> Result<Vec<PointPlan>> {
        Ok(scenario
            .scales(&self.sweep)?
            .into_iter()
            .map(|n| (n, self.plan_point(scenario, n)))
            .collect())
    }

    fn plan_point(
        &self,
        scenario: &ScenarioSpec,
        parallelism: u32,
    ) -> Result<(ParameterPoint, ExperimentConfig)> {
        let point = scenario.point(parallelism, &self.sweep, &self.fault)?;
        let config = self.builder.build(
            scenario,
            point.graph_size,
            self.sweep.shard_count,
            parallelism,
            &point.overrides,
        )?;
        Ok((point, config))
    }

    fn provision_key(&self, point: &ParameterPoint, config: &ExperimentConfig) -> (u32, u32, String) {
        (
            point.graph_size,
            self.sweep.shard_count,
            config.hostfile().to_string(),
        )
    }

    fn restore_log_name(&self, scenario: &ScenarioSpec, point: &ParameterPoint) -> String {
        format!("{}.{}", scenario.restore_log_name(), point.parallelism)
    }

    async fn run_point(
        &self,
        scenario: &ScenarioSpec,
        point: &ParameterPoint,
        config: ExperimentConfig,
        provisioned: &mut ProvisionedSet,
    ) -> Vec<RunRecord> {
        let kind = scenario.kind;

        if point.provision {
            if provisioned.insert(self.provision_key(point, &config)) {
                if let Err(err) = self
                    .provisioner
                    .build_graph(point.graph_size, self.sweep.shard_count, config.hostfile())
                    .await
                {
                    warn!(error = %err, "continuing with whatever graph data exists at the prefix");
                }
            } else {
                debug!("graph already provisioned in this scenario");
            }
        }

        if let Err(err) = self
            .checkpoints
            .prepare_write_location(point.graph_size, config.hostfile())
            .await
        {
            if config.checkpoint_enabled() {
                error!(error = %err, "checkpoint write location not clean; skipping point");
                return vec![RunRecord::skipped(
                    kind,
                    config,
                    self.orchestrator.log_path(&point.log_name),
                    err.to_string(),
                )];
            }
            warn!(error = %err, "could not clear checkpoint location; run does not checkpoint");
        }

        let Some(plan) = point.fault.as_ref() else {
            return vec![self.orchestrator.execute(kind, config, &point.log_name).await];
        };

        let kill = self.injector.schedule_kill(plan.delay, &plan.kill_command);
        let faulted = self
            .orchestrator
            .execute(kind, config.clone(), &point.log_name)
            .await;
        kill.cancel();

        let restored = self
            .injector
            .restore(
                kind,
                &config,
                &plan.dead_worker_ids,
                &self.checkpoints,
                &self.orchestrator,
                &self.restore_log_name(scenario, point),
            )
            .await;

        vec![faulted, restored]
    }
}
