// src/run/provision.rs

use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::{Result, SweepError};
use crate::exec::{ExecutorBackend, Invocation, InvocationKind};
use crate::plan::{CommandBuilder, ConfigBuilder};

/// Issues the distributed graph-construction job.
///
/// Rebuilding a size overwrites the data at the same prefix, so repeating a
/// call is safe, only wasteful.
pub struct GraphProvisioner {
    backend: Arc<dyn ExecutorBackend>,
    builder: ConfigBuilder,
    commands: CommandBuilder,
}

impl GraphProvisioner {
    pub fn new(
        backend: Arc<dyn ExecutorBackend>,
        builder: ConfigBuilder,
        commands: CommandBuilder,
    ) -> Self {
        Self {
            backend,
            builder,
            commands,
        }
    }

    pub async fn build_graph(&self, graph_size: u32, shard_count: u32, hostfile: &str) -> Result<()> {
        let config = self.builder.build_graph(graph_size, shard_count, hostfile)?;
        let argv = self.commands.launch_argv(&config);

        info!(
            graph_size,
            shard_count,
            hostfile,
            prefix = %config.graph_path_prefix().display(),
            "building graph"
        );

        let failure = match self
            .backend
            .run(Invocation::new(InvocationKind::Provision, argv))
            .await
        {
            Ok(report) if report.is_success() => None,
            Ok(report) => Some(report.describe()),
            Err(err) => Some(format!("{err:#}")),
        };

        match failure {
            None => {
                info!(graph_size, "graph built");
                Ok(())
            }
            Some(detail) => {
                warn!(graph_size, error = %detail, "graph construction failed");
                Err(SweepError::ProvisionError { graph_size, detail })
            }
        }
    }
}
