// src/checkpoint/mod.rs

//! Checkpoint directory manager.
//!
//! Owns the write/read path layout and clears write locations before runs.
//! Read locations are only ever resolved, never created or cleared.

pub mod layout;
pub mod storage;

use std::path::PathBuf;

use tracing::info;

use crate::errors::Result;

pub use layout::CheckpointLayout;
pub use storage::{CheckpointStorage, ClusterStorage, LocalStorage};

pub struct CheckpointManager {
    layout: CheckpointLayout,
    storage: Box<dyn CheckpointStorage>,
}

impl CheckpointManager {
    pub fn new(layout: CheckpointLayout, storage: Box<dyn CheckpointStorage>) -> Self {
        Self { layout, storage }
    }

    pub fn layout(&self) -> &CheckpointLayout {
        &self.layout
    }

    /// Recreate the write directory for `graph_size` empty on the hosts of
    /// `hostfile` and return it.
    pub async fn prepare_write_location(&self, graph_size: u32, hostfile: &str) -> Result<PathBuf> {
        let path = self.layout.write_path(graph_size);
        info!(graph_size, hostfile, path = %path.display(), "clearing checkpoint write location");
        self.storage.reset(&path, hostfile).await?;
        Ok(path)
    }

    /// Recreate the directory a restore run of `graph_size` writes into.
    pub async fn prepare_restore_location(
        &self,
        graph_size: u32,
        hostfile: &str,
    ) -> Result<PathBuf> {
        let path = self.layout.restore_write_path(graph_size);
        info!(graph_size, hostfile, path = %path.display(), "clearing restore write location");
        self.storage.reset(&path, hostfile).await?;
        Ok(path)
    }

    /// Read-side location for `graph_size`. No side effects.
    pub fn resolve_read_location(&self, graph_size: u32) -> PathBuf {
        self.layout.read_path(graph_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::FileSystem;
    use crate::fs::mock::MockFileSystem;
    use std::sync::Arc;

    #[tokio::test]
    async fn resolving_read_location_touches_nothing() {
        let fs = MockFileSystem::new();
        let manager = CheckpointManager::new(
            CheckpointLayout::new("/w", "/r"),
            Box::new(LocalStorage::new(Arc::new(fs.clone()))),
        );

        let read = manager.resolve_read_location(10);
        assert_eq!(read, PathBuf::from("/r/10M"));
        assert!(!fs.exists(&read));

        let write = manager.prepare_write_location(10, "fast_hostfile").await.unwrap();
        assert_eq!(write, PathBuf::from("/w/10M"));
        assert!(fs.is_dir(&write));
        assert!(!fs.exists(&read));
    }
}
