// src/checkpoint/layout.rs

use std::path::PathBuf;

/// Pure mapping from graph size to checkpoint directories.
///
/// Every path is `{root}/{size}M` (restore runs write to `{size}M-restore`),
/// so locations for different sizes never overlap and, with distinct roots,
/// the write and read location for one size never coincide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckpointLayout {
    write_root: PathBuf,
    read_root: PathBuf,
}

impl CheckpointLayout {
    pub fn new(write_root: impl Into<PathBuf>, read_root: impl Into<PathBuf>) -> Self {
        Self {
            write_root: write_root.into(),
            read_root: read_root.into(),
        }
    }

    pub fn write_path(&self, graph_size: u32) -> PathBuf {
        self.write_root.join(size_dir(graph_size))
    }

    pub fn read_path(&self, graph_size: u32) -> PathBuf {
        self.read_root.join(size_dir(graph_size))
    }

    /// Where a restore run persists its own checkpoints. Its read side is the
    /// faulted run's write path, so this must not be that same directory.
    pub fn restore_write_path(&self, graph_size: u32) -> PathBuf {
        self.write_root.join(format!("{}-restore", size_dir(graph_size)))
    }
}

/// `{size}M`, the directory name shared by graph data and checkpoints.
pub fn size_dir(graph_size: u32) -> String {
    format!("{graph_size}M")
}
