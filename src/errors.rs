// src/errors.rs

//! Crate-wide error aliases and helpers.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// A parameter handed to the config builder was out of range.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A checkpoint location could not be created or cleared.
    #[error("Storage error at {path:?}: {source}")]
    StorageError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The distributed graph-construction job failed.
    #[error("Graph provisioning failed for {graph_size}M: {detail}")]
    ProvisionError { graph_size: u32, detail: String },
}

impl SweepError {
    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SweepError::StorageError {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, SweepError>;
