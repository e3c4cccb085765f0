//! Storage trait and error types.
//!
//! Provides the core [`Storage`] trait for walking the documentation tree,
//! along with [`StorageError`] for unified error handling across backends.
//!
//! # Path Convention
//!
//! All path parameters are relative to the storage root and use `/`
//! separators. The root directory itself is `""`.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Kind of a directory entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory that can be listed further.
    Dir,
}

/// Single entry returned by [`Storage::list`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// File or directory name (last path component).
    pub name: String,
    /// Whether the entry is a file or a directory.
    pub kind: EntryKind,
}

impl Entry {
    /// Create a file entry.
    #[must_use]
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::File,
        }
    }

    /// Create a directory entry.
    #[must_use]
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: EntryKind::Dir,
        }
    }
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
pub enum StorageErrorKind {
    /// Resource does not exist.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Invalid path (e.g. escapes the storage root).
    InvalidPath,
    /// Content exists but is not valid UTF-8 text.
    InvalidData,
    /// Other/unknown error category.
    Other,
}

/// Storage error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    /// Backend identifier (e.g., "Fs", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a storage error from an I/O error.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidData => StorageErrorKind::InvalidData,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (path: /foo/bar)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::PermissionDenied => "Permission denied",
            StorageErrorKind::InvalidPath => "Invalid path",
            StorageErrorKind::InvalidData => "Invalid data",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read-only view of a documentation tree.
///
/// Implementations must return directory listings sorted by name so that
/// traversal order (and therefore category order and parent precedence) is
/// deterministic across backends.
pub trait Storage: Send + Sync {
    /// Root location, used for diagnostics.
    fn root(&self) -> &Path;

    /// Check whether the root directory exists.
    fn exists(&self) -> bool;

    /// List the immediate children of a directory, sorted by name.
    ///
    /// # Arguments
    ///
    /// * `dir` - Directory relative to the root (`""` for the root itself)
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the directory doesn't exist or can't be read.
    fn list(&self, dir: &Path) -> Result<Vec<Entry>, StorageError>;

    /// Read a file as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the file doesn't exist, can't be read, or
    /// isn't valid UTF-8.
    fn read(&self, path: &Path) -> Result<String, StorageError>;

    /// Latest modification time anywhere in the tree.
    ///
    /// Only metadata is consulted, file contents are never read. Returns
    /// `Ok(None)` when the root doesn't exist or no timestamp is available.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the tree can't be walked.
    fn last_modified(&self) -> Result<Option<SystemTime>, StorageError>;
}
