//! Documentation library facade.
//!
//! [`DocsLibrary`] binds one documentation root to one [`ScanCache`] and
//! exposes the lookups used by the HTTP layer and the CLI.

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant, SystemTime};

use ward_storage::Storage;

use crate::cache::{Clock, DEFAULT_TTL, ScanCache, SystemClock};
use crate::document::{DocCategory, DocFile, ScanResult};
use crate::error::DocsError;
use crate::scanner;

/// Convert Duration to milliseconds as f64.
fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

/// Configuration for [`DocsLibrary`].
#[derive(Clone, Debug)]
pub struct LibraryConfig {
    /// Serve cached scans at all. When `false` every lookup rescans.
    pub cache_enabled: bool,
    /// Lifetime of a cached scan.
    pub cache_ttl: Duration,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            cache_ttl: DEFAULT_TTL,
        }
    }
}

/// Cached access to a documentation tree.
///
/// # Thread Safety
///
/// Lookups can run concurrently. Readers share `Arc<ScanResult>` snapshots,
/// so a lookup never observes a partially rebuilt result. Rescans are
/// serialized by `reload_lock`: when several lookups find the cache stale at
/// once, one rescans and the others reuse its result.
pub struct DocsLibrary {
    storage: Arc<dyn Storage>,
    cache: ScanCache,
    cache_enabled: bool,
    /// Mutex for serializing rescans.
    reload_lock: Mutex<()>,
}

impl DocsLibrary {
    /// Create a library over `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, config: LibraryConfig) -> Self {
        Self::with_clock(storage, config, Arc::new(SystemClock))
    }

    /// Create a library with a custom cache clock.
    #[must_use]
    pub fn with_clock(
        storage: Arc<dyn Storage>,
        config: LibraryConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            storage,
            cache: ScanCache::with_clock(config.cache_ttl, clock),
            cache_enabled: config.cache_enabled,
            reload_lock: Mutex::new(()),
        }
    }

    /// Documentation root this library reads from.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.storage.root()
    }

    /// Scan the documentation tree, serving a cached result when valid.
    ///
    /// With `use_cache = false` a fresh scan is returned and the cache is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::RootNotFound`] if the documentation root is missing.
    ///
    /// # Panics
    ///
    /// Panics if internal locks are poisoned.
    pub fn scan(&self, use_cache: bool) -> Result<Arc<ScanResult>, DocsError> {
        if !use_cache || !self.cache_enabled {
            return scanner::scan(self.storage.as_ref()).map(Arc::new);
        }
        let start = Instant::now();

        // Fast path: cache valid
        let Some(modified) = self.source_modified() else {
            return scanner::scan(self.storage.as_ref()).map(Arc::new);
        };
        if let Some(result) = self.cache.get(modified) {
            return Ok(result);
        }

        // Slow path: acquire reload lock
        let _guard = self.reload_lock.lock().unwrap();

        // Double-check after acquiring lock
        let Some(modified) = self.source_modified() else {
            return scanner::scan(self.storage.as_ref()).map(Arc::new);
        };
        if let Some(result) = self.cache.get(modified) {
            return Ok(result);
        }

        let result = Arc::new(scanner::scan(self.storage.as_ref())?);
        self.cache.set(Arc::clone(&result), modified);

        tracing::info!(
            category_count = result.len(),
            ttl_secs = self.cache.ttl().as_secs(),
            elapsed_ms = elapsed_ms(start),
            "Documentation reloaded"
        );

        Ok(result)
    }

    /// Look up one category by slug.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::RootNotFound`] if the documentation root is missing.
    pub fn category(&self, slug: &str, use_cache: bool) -> Result<Option<DocCategory>, DocsError> {
        Ok(self.scan(use_cache)?.category(slug).cloned())
    }

    /// All categories in first-sight order.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::RootNotFound`] if the documentation root is missing.
    pub fn categories(&self, use_cache: bool) -> Result<Vec<DocCategory>, DocsError> {
        Ok(self.scan(use_cache)?.categories().to_vec())
    }

    /// Files of a category, parent first. Empty for unknown categories.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::RootNotFound`] if the documentation root is missing.
    pub fn category_files(&self, slug: &str, use_cache: bool) -> Result<Vec<DocFile>, DocsError> {
        let result = self.scan(use_cache)?;
        Ok(result
            .category(slug)
            .map(|c| c.all_files().cloned().collect())
            .unwrap_or_default())
    }

    /// Look up a file by its exact root-relative path within a category.
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::RootNotFound`] if the documentation root is missing.
    pub fn doc_file(
        &self,
        slug: &str,
        file_path: &str,
        use_cache: bool,
    ) -> Result<Option<DocFile>, DocsError> {
        let result = self.scan(use_cache)?;
        Ok(result
            .category(slug)
            .and_then(|c| c.file(file_path))
            .cloned())
    }

    /// Look up a file within a category using tolerant matching.
    ///
    /// `path` may omit `.md` and may use dashes in place of spaces.
    /// See [`DocCategory::find_file`].
    ///
    /// # Errors
    ///
    /// Returns [`DocsError::RootNotFound`] if the documentation root is missing.
    pub fn file_by_path(
        &self,
        slug: &str,
        path: &str,
        use_cache: bool,
    ) -> Result<Option<DocFile>, DocsError> {
        let result = self.scan(use_cache)?;
        Ok(result
            .category(slug)
            .and_then(|c| c.find_file(path))
            .cloned())
    }

    /// Drop the cached scan. The next cached lookup rescans.
    ///
    /// Readers holding an `Arc<ScanResult>` keep their snapshot.
    pub fn invalidate_cache(&self) {
        self.cache.invalidate();
        tracing::debug!(root = %self.root().display(), "Documentation cache invalidated");
    }

    /// Latest modification time, or `None` when it can't be determined.
    fn source_modified(&self) -> Option<Option<SystemTime>> {
        match self.storage.last_modified() {
            Ok(modified) => Some(modified),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read modification times, bypassing cache");
                None
            }
        }
    }
}
