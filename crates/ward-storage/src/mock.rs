//! Mock storage implementation for testing.
//!
//! Provides [`MockStorage`] for unit testing without filesystem access.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, SystemTime};

use crate::storage::{Entry, EntryKind, Storage, StorageError, StorageErrorKind};

/// Backend identifier for error messages.
const BACKEND: &str = "Mock";

#[derive(Debug, Clone)]
enum MockFile {
    Text(String),
    Unreadable,
}

/// Mock storage for testing.
///
/// Stores files in memory keyed by their relative path. Directories are
/// implied by file paths. Every successful or failed [`Storage::read`] is
/// counted so cache behavior can be asserted, and every mutation bumps a
/// revision that drives [`Storage::last_modified`].
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use ward_storage::{MockStorage, Storage};
///
/// let storage = MockStorage::new()
///     .with_file("commands/ban.md", "<file><file:name val=\"Ban\"></file>");
///
/// let text = storage.read(Path::new("commands/ban.md")).unwrap();
/// assert_eq!(storage.read_count(), 1);
/// ```
#[derive(Debug)]
pub struct MockStorage {
    root: PathBuf,
    files: RwLock<BTreeMap<PathBuf, MockFile>>,
    present: AtomicBool,
    revision: AtomicU64,
    reads: AtomicUsize,
}

impl Default for MockStorage {
    fn default() -> Self {
        Self {
            root: PathBuf::from("mock://docs"),
            files: RwLock::new(BTreeMap::new()),
            present: AtomicBool::new(true),
            revision: AtomicU64::new(1),
            reads: AtomicUsize::new(0),
        }
    }
}

impl MockStorage {
    /// Create a new empty mock storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with the given content.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_file(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.set_file(path, content);
        self
    }

    /// Add a file whose reads always fail with a permission error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_unreadable_file(self, path: impl Into<PathBuf>) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), MockFile::Unreadable);
        self.touch();
        self
    }

    /// Simulate a missing root directory.
    #[must_use]
    pub fn without_root(self) -> Self {
        self.present.store(false, Ordering::SeqCst);
        self
    }

    /// Insert or replace a file after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_file(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), MockFile::Text(content.into()));
        self.touch();
    }

    /// Remove a file after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        self.files.write().unwrap().remove(path.as_ref());
        self.touch();
    }

    /// Number of [`Storage::read`] calls made so far.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn touch(&self) {
        self.revision.fetch_add(1, Ordering::SeqCst);
    }
}

impl Storage for MockStorage {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self) -> bool {
        self.present.load(Ordering::SeqCst)
    }

    fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError> {
        if !self.exists() {
            return Err(StorageError::not_found(dir).with_backend(BACKEND));
        }

        let files = self.files.read().unwrap();
        let mut children: BTreeSet<(String, bool)> = BTreeSet::new();
        for path in files.keys() {
            let Ok(rest) = path.strip_prefix(dir) else {
                continue;
            };
            let mut components = rest.components();
            let Some(first) = components.next() else {
                continue;
            };
            let name = first.as_os_str().to_string_lossy().into_owned();
            let is_dir = components.next().is_some();
            children.insert((name, is_dir));
        }

        if children.is_empty() && !dir.as_os_str().is_empty() {
            return Err(StorageError::not_found(dir).with_backend(BACKEND));
        }

        Ok(children
            .into_iter()
            .map(|(name, is_dir)| Entry {
                name,
                kind: if is_dir {
                    EntryKind::Dir
                } else {
                    EntryKind::File
                },
            })
            .collect())
    }

    fn read(&self, path: &Path) -> Result<String, StorageError> {
        self.reads.fetch_add(1, Ordering::SeqCst);

        match self.files.read().unwrap().get(path) {
            Some(MockFile::Text(content)) => Ok(content.clone()),
            Some(MockFile::Unreadable) => Err(StorageError::new(
                StorageErrorKind::PermissionDenied,
            )
            .with_path(path)
            .with_backend(BACKEND)),
            None => Err(StorageError::not_found(path).with_backend(BACKEND)),
        }
    }

    fn last_modified(&self) -> Result<Option<SystemTime>, StorageError> {
        if !self.exists() {
            return Ok(None);
        }
        let revision = self.revision.load(Ordering::SeqCst);
        Ok(Some(SystemTime::UNIX_EPOCH + Duration::from_secs(revision)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_list_root_derives_dirs() {
        let storage = MockStorage::new()
            .with_file("intro.md", "intro")
            .with_file("commands/ban.md", "ban")
            .with_file("commands/kick.md", "kick");

        let entries = storage.list(Path::new("")).unwrap();

        assert_eq!(
            entries,
            vec![Entry::dir("commands"), Entry::file("intro.md")]
        );
    }

    #[test]
    fn test_list_subdir() {
        let storage = MockStorage::new()
            .with_file("commands/kick.md", "kick")
            .with_file("commands/ban.md", "ban");

        let entries = storage.list(Path::new("commands")).unwrap();

        assert_eq!(entries, vec![Entry::file("ban.md"), Entry::file("kick.md")]);
    }

    #[test]
    fn test_list_unknown_dir() {
        let storage = MockStorage::new().with_file("intro.md", "intro");

        let err = storage.list(Path::new("missing")).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::NotFound);
    }

    #[test]
    fn test_read_counts_calls() {
        let storage = MockStorage::new().with_file("intro.md", "intro");

        assert_eq!(storage.read(Path::new("intro.md")).unwrap(), "intro");
        assert!(storage.read(Path::new("other.md")).is_err());
        assert_eq!(storage.read_count(), 2);
    }

    #[test]
    fn test_unreadable_file() {
        let storage = MockStorage::new().with_unreadable_file("locked.md");

        let err = storage.read(Path::new("locked.md")).unwrap_err();

        assert_eq!(err.kind, StorageErrorKind::PermissionDenied);
    }

    #[test]
    fn test_last_modified_changes_on_mutation() {
        let storage = MockStorage::new().with_file("intro.md", "intro");
        let before = storage.last_modified().unwrap();

        storage.set_file("intro.md", "changed");

        assert_ne!(storage.last_modified().unwrap(), before);
    }

    #[test]
    fn test_without_root() {
        let storage = MockStorage::new().without_root();

        assert!(!storage.exists());
        assert_eq!(storage.last_modified().unwrap(), None);
    }
}
