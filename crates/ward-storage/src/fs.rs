//! Filesystem storage implementation.
//!
//! Provides [`FsStorage`] for walking a documentation tree on the local
//! filesystem.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Fs";

/// Filesystem storage implementation.
///
/// # Example
///
/// ```ignore
/// use std::path::{Path, PathBuf};
/// use ward_storage::{FsStorage, Storage};
///
/// let storage = FsStorage::new(PathBuf::from("docs"));
/// let text = storage.read(Path::new("commands/overview.md"))?;
/// ```
#[derive(Debug, Clone)]
pub struct FsStorage {
    /// Root directory of the documentation tree.
    source_dir: PathBuf,
}

impl FsStorage {
    /// Create a new filesystem storage rooted at `source_dir`.
    #[must_use]
    pub fn new(source_dir: PathBuf) -> Self {
        Self { source_dir }
    }

    /// Validate that a path doesn't escape the source directory.
    ///
    /// Rejects paths containing parent directory components (`..`) to prevent
    /// path traversal attacks (e.g., `../../../etc/passwd`).
    fn validate_path(path: &Path) -> Result<(), StorageError> {
        let has_parent_dir = path
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir));

        if has_parent_dir {
            return Err(StorageError::new(StorageErrorKind::InvalidPath)
                .with_path(path)
                .with_backend(BACKEND));
        }
        Ok(())
    }

    fn io_error(err: std::io::Error, path: &Path) -> StorageError {
        StorageError::io(err, Some(path.to_path_buf())).with_backend(BACKEND)
    }

    /// Fold the newest modification time under `dir` into `latest`.
    ///
    /// Symlinks count with their target's time but are never descended into.
    /// Unreadable subdirectories are logged and skipped; only a failure to
    /// read `dir` itself is an error.
    fn walk_modified(dir: &Path, latest: &mut Option<SystemTime>) -> Result<(), StorageError> {
        let entries = fs::read_dir(dir).map_err(|e| Self::io_error(e, dir))?;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!(dir = %dir.display(), error = %err, "Skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                continue;
            };
            let metadata = if file_type.is_symlink() {
                fs::metadata(&path)
            } else {
                entry.metadata()
            };
            let Ok(metadata) = metadata else {
                // Dangling symlink or entry removed mid-walk.
                continue;
            };

            if let Ok(modified) = metadata.modified() {
                *latest = Some(latest.map_or(modified, |current| current.max(modified)));
            }

            if file_type.is_dir()
                && let Err(err) = Self::walk_modified(&path, latest)
            {
                tracing::warn!(path = %path.display(), error = %err, "Skipping unreadable directory");
            }
        }

        Ok(())
    }
}

impl Storage for FsStorage {
    fn root(&self) -> &Path {
        &self.source_dir
    }

    fn exists(&self) -> bool {
        self.source_dir.is_dir()
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError> {
        Self::validate_path(dir)?;
        let full_path = self.source_dir.join(dir);
        let read_dir = fs::read_dir(&full_path).map_err(|e| Self::io_error(e, &full_path))?;

        let mut entries = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| Self::io_error(e, &full_path))?;
            let Ok(name) = entry.file_name().into_string() else {
                tracing::warn!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                continue;
            };
            // Symlinks are never reported as directories.
            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            let kind = if is_dir {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            entries.push(Entry { name, kind });
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        Self::validate_path(path)?;
        let full_path = self.source_dir.join(path);
        fs::read_to_string(&full_path).map_err(|e| Self::io_error(e, &full_path))
    }

    fn last_modified(&self) -> Result<Option<SystemTime>, StorageError> {
        if !self.exists() {
            return Ok(None);
        }

        let mut latest = fs::metadata(&self.source_dir)
            .and_then(|m| m.modified())
            .ok();
        Self::walk_modified(&self.source_dir, &mut latest)?;
        Ok(latest)
    }
}
