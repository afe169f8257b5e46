// src/config/mod.rs

//! Configuration loading and validation for shardsweep.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a sweep file from disk (`loader.rs`).
//! - Validate sizes, directories and scenario parameters (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{
    ClusterSection, EngineSection, FaultSection, RawSweepFile, ScenarioEntry, SweepConfiguration,
    SweepFile,
};
