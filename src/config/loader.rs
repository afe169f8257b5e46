// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawSweepFile, SweepFile};
use crate::errors::Result;

/// Load a sweep file from a given path and return the raw `RawSweepFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawSweepFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawSweepFile = toml::from_str(&contents)?;

    Ok(raw)
}

/// Load a sweep file from path and validate it.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` default functions).
/// - Checks sizes, the parallelism list, checkpoint roots, command prefixes
///   and per-scenario parameters.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SweepFile> {
    let raw = load_from_path(&path)?;
    SweepFile::try_from(raw)
}

/// `Shardsweep.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Shardsweep.toml")
}
