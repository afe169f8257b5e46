// src/run/mod.rs

//! Everything that touches the engine for one parameter point.
//!
//! - [`provision`]: one-shot distributed graph construction.
//! - [`orchestrator`]: one engine invocation, classified into a [`RunRecord`].
//! - [`fault`]: delayed kill and the restore run that follows it.

pub mod fault;
pub mod orchestrator;
pub mod provision;
pub mod record;

pub use fault::{FaultInjector, KillHandle};
pub use orchestrator::RunOrchestrator;
pub use provision::GraphProvisioner;
pub use record::{RunOutcome, RunRecord};
