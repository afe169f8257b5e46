use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// The experiment variants a sweep knows how to run.
///
/// - `SizeScaling`: graph size grows with parallelism.
/// - `TimeScaling`: graph size fixed, parallelism grows.
/// - `WorkStealing`: one point on a deliberately unbalanced hostfile.
/// - `CheckpointFault`: checkpointed run, delayed kill, restore with dead workers.
/// - `ClusterElastic`: scaled sizes with the graph kept in memory, no provisioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScenarioKind {
    SizeScaling,
    TimeScaling,
    WorkStealing,
    CheckpointFault,
    ClusterElastic,
}

impl ScenarioKind {
    pub const ALL: [ScenarioKind; 5] = [
        ScenarioKind::SizeScaling,
        ScenarioKind::TimeScaling,
        ScenarioKind::WorkStealing,
        ScenarioKind::CheckpointFault,
        ScenarioKind::ClusterElastic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ScenarioKind::SizeScaling => "size-scaling",
            ScenarioKind::TimeScaling => "time-scaling",
            ScenarioKind::WorkStealing => "work-stealing",
            ScenarioKind::CheckpointFault => "checkpoint-fault",
            ScenarioKind::ClusterElastic => "cluster-elastic",
        }
    }

    /// Scenarios that sweep over the configured parallelism list.
    pub fn is_sweep(self) -> bool {
        matches!(
            self,
            ScenarioKind::SizeScaling | ScenarioKind::TimeScaling | ScenarioKind::ClusterElastic
        )
    }

    /// Suffix used to derive the default log name (`{runner}.{suffix}`).
    pub fn log_suffix(self) -> &'static str {
        match self {
            ScenarioKind::SizeScaling => "scaled_size",
            ScenarioKind::TimeScaling => "fixed_size",
            ScenarioKind::WorkStealing => "with_stealing",
            ScenarioKind::CheckpointFault => "checkpoint_fault",
            ScenarioKind::ClusterElastic => "ec2",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScenarioKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('_', "-");
        ScenarioKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| {
                format!(
                    "invalid scenario kind: {s} (expected one of size-scaling, time-scaling, \
                     work-stealing, checkpoint-fault, cluster-elastic)"
                )
            })
    }
}

/// Where checkpoint directories live and therefore how they are cleared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckpointStorageMode {
    /// Directories live on every cluster host; cleared through the cluster shell.
    #[default]
    Cluster,
    /// Directories live on this machine (shared mount or single-host runs).
    Local,
}
