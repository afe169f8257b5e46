// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The orchestration components talk to an `ExecutorBackend` instead of
//! spawning processes themselves. This keeps command construction (pure,
//! in `plan::command`) separate from the transport, and lets tests swap in
//! a fake that records invocations and scripts their exit codes.

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use super::process::run_process;
use super::{ExitReport, Invocation};

/// Trait abstracting how invocations are executed.
///
/// `run` resolves once the invocation has finished. An `Err` means the
/// process could not be started or waited on; a non-zero exit is an
/// `Ok(ExitReport)` and it is up to the caller to classify it.
///
/// Backends are shared (`Send + Sync`) because the fault injector issues its
/// delayed kill from a spawned task while a run is still in flight.
pub trait ExecutorBackend: Send + Sync {
    fn run(
        &self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ExitReport>> + Send + '_>>;
}

/// Real backend used in production: one OS process per invocation.
#[derive(Debug, Clone, Default)]
pub struct ProcessBackend;

impl ProcessBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ExecutorBackend for ProcessBackend {
    fn run(
        &self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = anyhow::Result<ExitReport>> + Send + '_>> {
        Box::pin(async move {
            debug!(kind = %invocation.kind, cmd = %invocation.display(), "dispatching invocation");
            run_process(&invocation).await
        })
    }
}
