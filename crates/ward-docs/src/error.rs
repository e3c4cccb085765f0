//! Error type for documentation lookups.

use std::path::PathBuf;

use ward_storage::StorageError;

/// Error returned by scans and library lookups.
///
/// Per-file problems (unreadable files, malformed tags, broken references)
/// never surface here. They are logged or rendered inline instead.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    /// The documentation root directory does not exist.
    #[error("Documentation root not found: {}", .0.display())]
    RootNotFound(PathBuf),
    /// The documentation root exists but could not be listed.
    #[error("Failed to read documentation root: {0}")]
    Storage(#[from] StorageError),
}
