// src/fs/mock.rs

use super::FileSystem;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir,
}

/// In-memory filesystem. Clones share the same tree.
///
/// Failures can be injected per path with [`MockFileSystem::fail_on`].
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<BTreeMap<PathBuf, MockEntry>>>,
    failing: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, implicitly creating its parent directories.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref();
        let mut entries = self.lock();
        if let Some(parent) = path.parent() {
            insert_dirs(&mut entries, parent);
        }
        entries.insert(path.to_path_buf(), MockEntry::File(content.into()));
    }

    /// Make every mutating operation on `path` fail with `PermissionDenied`.
    pub fn fail_on(&self, path: impl AsRef<Path>) {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(path.as_ref().to_path_buf());
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, MockEntry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_failing(&self, path: &Path) -> io::Result<()> {
        let failing = self.failing.lock().unwrap_or_else(|e| e.into_inner());
        if failing.iter().any(|p| p == path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected failure for {:?}", path),
            ));
        }
        Ok(())
    }
}

fn insert_dirs(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
    for ancestor in path.ancestors() {
        if ancestor.as_os_str().is_empty() {
            continue;
        }
        entries
            .entry(ancestor.to_path_buf())
            .or_insert(MockEntry::Dir);
    }
}

impl FileSystem for MockFileSystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check_failing(path)?;
        let mut entries = self.lock();
        if let Some(MockEntry::File(_)) = entries.get(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("file exists at {:?}", path),
            ));
        }
        insert_dirs(&mut entries, path);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check_failing(path)?;
        let mut entries = self.lock();
        match entries.get(path) {
            Some(MockEntry::Dir) => {
                entries.retain(|p, _| !p.starts_with(path));
                Ok(())
            }
            Some(MockEntry::File(_)) => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("not a directory: {:?}", path),
            )),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {:?}", path),
            )),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::Dir))
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        let entries = self.lock();
        match entries.get(path) {
            Some(MockEntry::Dir) => Ok(entries
                .keys()
                .filter(|p| p.parent() == Some(path))
                .cloned()
                .collect()),
            _ => Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("not a directory or not found: {:?}", path),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_dir_all_drops_descendants_only() {
        let fs = MockFileSystem::new();
        fs.add_file("/ckpt/100M/shard-0", "x");
        fs.add_file("/ckpt/1000M/shard-0", "y");

        fs.remove_dir_all(Path::new("/ckpt/100M")).unwrap();

        assert!(!fs.exists(Path::new("/ckpt/100M")));
        assert!(!fs.exists(Path::new("/ckpt/100M/shard-0")));
        assert!(fs.exists(Path::new("/ckpt/1000M/shard-0")));
    }

    #[test]
    fn removing_missing_dir_is_not_found() {
        let fs = MockFileSystem::new();
        let err = fs.remove_dir_all(Path::new("/nope")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
