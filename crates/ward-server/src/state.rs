//! Application state.
//!
//! Shared state for all request handlers.

use std::path::PathBuf;

use ward_docs::DocsLibrary;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Cached access to the documentation tree.
    pub(crate) library: DocsLibrary,
    /// Files served by `/api/retrieve`.
    pub(crate) retrieve: RetrieveState,
    /// Application version, mixed into `ETag`s.
    pub(crate) version: String,
}

/// Allowlisted static files.
pub(crate) struct RetrieveState {
    /// Directory the files are read from.
    pub(crate) assets_dir: PathBuf,
    /// Request paths that may be served.
    pub(crate) allowed: Vec<String>,
}

impl RetrieveState {
    /// Returns `true` if `file` may be served.
    pub(crate) fn is_allowed(&self, file: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed == file)
    }
}
