// src/checkpoint/storage.rs

//! Where checkpoint directories physically live.
//!
//! - [`LocalStorage`] clears directories through a [`FileSystem`].
//! - [`ClusterStorage`] runs `rm -rf` + `mkdir -p` on every host through the
//!   cluster shell.

use std::future::Future;
use std::io;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;

use tracing::debug;

use crate::errors::{Result, SweepError};
use crate::exec::{ExecutorBackend, Invocation, InvocationKind, shell_quote};
use crate::fs::FileSystem;
use crate::plan::CommandBuilder;

/// Recreates a directory empty. Must succeed when the directory is missing
/// or already empty.
///
/// `hostfile` names the hosts the directory lives on; storage that is not
/// spread over a cluster ignores it.
pub trait CheckpointStorage: Send + Sync {
    fn reset<'a>(
        &'a self,
        path: &'a Path,
        hostfile: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

#[derive(Debug, Clone)]
pub struct LocalStorage {
    fs: Arc<dyn FileSystem>,
}

impl LocalStorage {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    fn reset_sync(&self, path: &Path) -> Result<()> {
        match self.fs.remove_dir_all(path) {
            Ok(()) => debug!(path = %path.display(), "removed old checkpoint directory"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(SweepError::storage(path, e)),
        }
        self.fs
            .create_dir_all(path)
            .map_err(|e| SweepError::storage(path, e))
    }
}

impl CheckpointStorage for LocalStorage {
    fn reset<'a>(
        &'a self,
        path: &'a Path,
        _hostfile: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move { self.reset_sync(path) })
    }
}

pub struct ClusterStorage {
    commands: CommandBuilder,
    backend: Arc<dyn ExecutorBackend>,
}

impl ClusterStorage {
    pub fn new(commands: CommandBuilder, backend: Arc<dyn ExecutorBackend>) -> Self {
        Self { commands, backend }
    }

    /// `rm -rf P && mkdir -p P`; both halves are no-ops on a clean host.
    pub fn reset_command(path: &Path) -> String {
        let quoted = shell_quote(&path.to_string_lossy());
        format!("rm -rf {quoted} && mkdir -p {quoted}")
    }
}

impl CheckpointStorage for ClusterStorage {
    fn reset<'a>(
        &'a self,
        path: &'a Path,
        hostfile: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(async move {
            let argv = self.commands.cluster_argv(hostfile, &Self::reset_command(path));
            let invocation = Invocation::new(InvocationKind::Storage, argv);

            let report = self
                .backend
                .run(invocation)
                .await
                .map_err(|e| SweepError::storage(path, io::Error::other(format!("{e:#}"))))?;

            if !report.is_success() {
                return Err(SweepError::storage(
                    path,
                    io::Error::other(format!("cluster shell {}", report.describe())),
                ));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use std::path::PathBuf;

    #[tokio::test]
    async fn local_reset_is_idempotent() {
        let fs = MockFileSystem::new();
        let storage = LocalStorage::new(Arc::new(fs.clone()));
        let dir = PathBuf::from("/ckpt/10M");

        storage.reset(&dir, "fast_hostfile").await.unwrap();
        assert!(fs.is_dir(&dir));
        storage.reset(&dir, "fast_hostfile").await.unwrap();
        assert!(fs.is_dir(&dir));
        assert!(fs.read_dir(&dir).unwrap().is_empty());
    }

    #[tokio::test]
    async fn local_reset_empties_stale_state() {
        let fs = MockFileSystem::new();
        fs.add_file("/ckpt/10M/epoch-3/shard-1", "stale");
        let storage = LocalStorage::new(Arc::new(fs.clone()));

        storage.reset(Path::new("/ckpt/10M"), "fast_hostfile").await.unwrap();
        assert!(!fs.exists(Path::new("/ckpt/10M/epoch-3")));
        assert!(fs.is_dir(Path::new("/ckpt/10M")));
    }

    #[tokio::test]
    async fn local_failure_carries_path() {
        let fs = MockFileSystem::new();
        fs.fail_on("/ckpt/10M");
        let storage = LocalStorage::new(Arc::new(fs));

        match storage.reset(Path::new("/ckpt/10M"), "fast_hostfile").await {
            Err(SweepError::StorageError { path, source }) => {
                assert_eq!(path, PathBuf::from("/ckpt/10M"));
                assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
            }
            other => panic!("expected StorageError, got {other:?}"),
        }
    }

    #[test]
    fn reset_command_quotes_paths() {
        assert_eq!(
            ClusterStorage::reset_command(Path::new("/scratch/checkpoints/10M")),
            "rm -rf /scratch/checkpoints/10M && mkdir -p /scratch/checkpoints/10M"
        );
        assert_eq!(
            ClusterStorage::reset_command(Path::new("/tmp/my dir")),
            "rm -rf '/tmp/my dir' && mkdir -p '/tmp/my dir'"
        );
    }
}
