//! Scan result caching.
//!
//! [`ScanCache`] holds a single scan result. An entry is served while both
//! hold:
//!
//! - no more than the TTL has elapsed since it was stored
//! - the storage's latest modification time equals the one recorded at store time
//!
//! Time comes from an injectable [`Clock`] so expiry can be tested without
//! sleeping.

use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant, SystemTime};

use crate::document::ScanResult;

/// Default lifetime of a cached scan.
pub const DEFAULT_TTL: Duration = Duration::from_secs(120);

/// Source of monotonic time for cache expiry.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by [`Instant::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// [`Clock`] that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    /// Create a clock frozen at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn advance(&self, by: Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }
}

struct CacheEntry {
    result: Arc<ScanResult>,
    stored_at: Instant,
    source_modified: Option<SystemTime>,
}

/// Single-slot cache for scan results.
pub struct ScanCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entry: RwLock<Option<CacheEntry>>,
}

impl ScanCache {
    /// Create a cache using the system clock.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create a cache with a custom clock.
    #[must_use]
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entry: RwLock::new(None),
        }
    }

    /// Configured time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached result if it is still valid.
    ///
    /// # Arguments
    ///
    /// * `source_modified` - Current latest modification time of the source tree
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn get(&self, source_modified: Option<SystemTime>) -> Option<Arc<ScanResult>> {
        let guard = self.entry.read().unwrap();
        let entry = guard.as_ref()?;

        let age = self.clock.now().saturating_duration_since(entry.stored_at);
        if age > self.ttl {
            tracing::debug!(age_ms = age.as_millis(), "Scan cache expired");
            return None;
        }
        if entry.source_modified != source_modified {
            tracing::debug!("Documentation changed since last scan");
            return None;
        }

        Some(Arc::clone(&entry.result))
    }

    /// Store a result, replacing any previous one.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set(&self, result: Arc<ScanResult>, source_modified: Option<SystemTime>) {
        *self.entry.write().unwrap() = Some(CacheEntry {
            result,
            stored_at: self.clock.now(),
            source_modified,
        });
    }

    /// Drop the cached result.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn invalidate(&self) {
        *self.entry.write().unwrap() = None;
    }
}

impl std::fmt::Debug for ScanCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScanCache")
            .field("ttl", &self.ttl)
            .field("populated", &self.entry.read().is_ok_and(|e| e.is_some()))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn modified(secs: u64) -> Option<SystemTime> {
        Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
    }

    fn cache() -> (ScanCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = ScanCache::with_clock(DEFAULT_TTL, Arc::clone(&clock) as Arc<dyn Clock>);
        (cache, clock)
    }

    #[test]
    fn test_empty_cache_misses() {
        let (cache, _) = cache();

        assert!(cache.get(modified(1)).is_none());
    }

    #[test]
    fn test_hit_within_ttl() {
        let (cache, clock) = cache();
        let result = Arc::new(ScanResult::default());
        cache.set(Arc::clone(&result), modified(1));

        clock.advance(DEFAULT_TTL);

        let cached = cache.get(modified(1)).unwrap();
        assert!(Arc::ptr_eq(&cached, &result));
    }

    #[test]
    fn test_miss_after_ttl() {
        let (cache, clock) = cache();
        cache.set(Arc::new(ScanResult::default()), modified(1));

        clock.advance(DEFAULT_TTL + Duration::from_millis(1));

        assert!(cache.get(modified(1)).is_none());
    }

    #[test]
    fn test_miss_when_source_modified() {
        let (cache, _) = cache();
        cache.set(Arc::new(ScanResult::default()), modified(1));

        assert!(cache.get(modified(2)).is_none());
    }

    #[test]
    fn test_invalidate() {
        let (cache, _) = cache();
        cache.set(Arc::new(ScanResult::default()), modified(1));

        cache.invalidate();

        assert!(cache.get(modified(1)).is_none());
    }

    #[test]
    fn test_set_replaces_entry() {
        let (cache, clock) = cache();
        cache.set(Arc::new(ScanResult::default()), modified(1));
        clock.advance(Duration::from_secs(100));
        cache.set(Arc::new(ScanResult::default()), modified(1));

        clock.advance(Duration::from_secs(100));

        assert!(cache.get(modified(1)).is_some());
    }

    static_assertions::assert_impl_all!(ScanCache: Send, Sync);
}
