//! Cache Store Module
//!
//! Main cache engine: a key-value map with absolute per-entry TTL, lazy
//! eviction on read and optional best-effort persistence to a single file.

use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::persist::{Entries, JsonFile, Persistence};
use crate::cache::{CacheEntry, CacheStats, Clock, SystemClock};
use crate::config::CacheConfig;

/// Mutable state guarded by the cache's lock.
struct Inner<V> {
    entries: Entries<V>,
    stats: CacheStats,
}

impl<V> Inner<V> {
    /// Drops every expired entry and returns how many were removed.
    fn prune(&mut self, now_ms: u64, ttl_ms: u64) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_live(now_ms, ttl_ms));
        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }
}

// == TTL Cache ==
/// Process-local key-value cache with per-entry expiry.
///
/// Values are never returned once `now - inserted_at > ttl`. Reads do not
/// refresh the timestamp; only [`TtlCache::set`] does.
///
/// A persistent cache writes its whole live store after every mutation and
/// reloads it at construction. Persistence errors are logged and counted but
/// never returned: callers only ever see the in-memory contract.
///
/// The store sits behind a mutex so the cache can be shared across threads,
/// but pairs of calls are not atomic. Two threads that both miss will both
/// compute and both `set`; the last write wins.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use civic_cache::cache::{MockClock, TtlCache};
///
/// let clock = MockClock::new();
/// let cache = TtlCache::with_clock(Duration::from_secs(2), clock.clone());
///
/// cache.set("x", 42);
/// assert_eq!(cache.get("x"), Some(42));
///
/// clock.advance(Duration::from_secs(3));
/// assert_eq!(cache.get("x"), None);
/// ```
pub struct TtlCache<V, C = SystemClock> {
    ttl: Duration,
    ttl_ms: u64,
    inner: Mutex<Inner<V>>,
    persistence: Option<Box<dyn Persistence<V>>>,
    clock: C,
}

impl<V> TtlCache<V, SystemClock> {
    // == Constructor ==
    /// Creates an in-memory cache using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<V> TtlCache<V, SystemClock>
where
    V: Serialize + DeserializeOwned,
{
    /// Creates a cache persisted as JSON at `path`, loading any live entries
    /// already stored there.
    pub fn persistent(ttl: Duration, path: impl Into<PathBuf>) -> Self {
        Self::with_persistence(ttl, Box::new(JsonFile::new(path)), SystemClock)
    }

    /// Creates a cache from its configuration block.
    pub fn from_config(config: &CacheConfig) -> Self {
        let ttl = Duration::from_secs(config.ttl_seconds);
        match &config.filepath {
            Some(path) => Self::persistent(ttl, path.clone()),
            None => Self::new(ttl),
        }
    }
}

impl<V, C: Clock> TtlCache<V, C> {
    /// Creates an in-memory cache driven by `clock`.
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self::build(ttl, None, clock)
    }

    /// Creates a cache backed by an arbitrary persistence layer.
    pub fn with_persistence(ttl: Duration, persistence: Box<dyn Persistence<V>>, clock: C) -> Self {
        Self::build(ttl, Some(persistence), clock)
    }

    fn build(ttl: Duration, persistence: Option<Box<dyn Persistence<V>>>, clock: C) -> Self {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let mut inner = Inner {
            entries: Entries::new(),
            stats: CacheStats::new(),
        };

        if let Some(store) = &persistence {
            match store.load() {
                Ok(Some(entries)) => {
                    inner.entries = entries;
                    let loaded = inner.entries.len();
                    let pruned = inner.prune(clock.now_ms(), ttl_ms);
                    debug!(
                        "Loaded {} cache entries from {} ({} expired, dropped)",
                        loaded,
                        store.location(),
                        pruned
                    );
                }
                Ok(None) => {
                    debug!("No cache file at {}, starting empty", store.location());
                }
                Err(err) => {
                    warn!("Ignoring unreadable cache file: {}", err);
                }
            }
        }

        Self {
            ttl,
            ttl_ms,
            inner: Mutex::new(inner),
            persistence,
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        // The map is never left half-updated, so a poisoned lock is still usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Prunes and writes the store if this cache is persistent.
    ///
    /// Must be called with the lock held so the snapshot is consistent.
    fn persist(&self, inner: &mut Inner<V>) {
        let Some(store) = &self.persistence else {
            return;
        };

        inner.prune(self.clock.now_ms(), self.ttl_ms);
        if let Err(err) = store.save(&inner.entries) {
            inner.stats.record_persist_failure();
            warn!("Failed to persist cache: {}", err);
        }
    }

    // == Get ==
    /// Returns the value for `key` if present and live.
    ///
    /// An expired entry is removed from memory and reported as absent. The
    /// backing file is not touched.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let now = self.clock.now_ms();
        let mut guard = self.lock();
        let inner = &mut *guard;

        let live = match inner.entries.get(key) {
            Some(entry) if entry.is_live(now, self.ttl_ms) => Some(entry.value.clone()),
            Some(_) => {
                inner.entries.remove(key);
                inner.stats.record_expirations(1);
                inner.stats.set_total_entries(inner.entries.len());
                None
            }
            None => None,
        };

        match live {
            Some(_) => inner.stats.record_hit(),
            None => inner.stats.record_miss(),
        }
        live
    }

    // == Set ==
    /// Inserts or replaces `key`, stamping it with the current time.
    ///
    /// Persistent caches then prune expired entries and rewrite the file.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let now = self.clock.now_ms();
        let mut inner = self.lock();

        inner.entries.insert(key.into(), CacheEntry::new(value, now));
        let len = inner.entries.len();
        inner.stats.set_total_entries(len);

        self.persist(&mut inner);
    }

    // == Remove ==
    /// Removes `key`, returning its value if it was still live.
    pub fn remove(&self, key: &str) -> Option<V> {
        let now = self.clock.now_ms();
        let mut inner = self.lock();

        let entry = inner.entries.remove(key)?;
        let len = inner.entries.len();
        inner.stats.set_total_entries(len);
        self.persist(&mut inner);

        if entry.is_live(now, self.ttl_ms) {
            Some(entry.value)
        } else {
            inner.stats.record_expirations(1);
            None
        }
    }

    // == Clear ==
    /// Empties the cache and deletes the backing file, if any.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.stats.set_total_entries(0);

        if let Some(store) = &self.persistence {
            if let Err(err) = store.remove() {
                inner.stats.record_persist_failure();
                warn!("Failed to delete cache file: {}", err);
            }
        }
    }

    // == Prune Expired ==
    /// Removes all expired entries from memory.
    ///
    /// Returns the number of entries removed. Not needed for correctness,
    /// since reads never return expired values, but keeps memory bounded for
    /// keys that are written once and never read again.
    pub fn prune_expired(&self) -> usize {
        let now = self.clock.now_ms();
        let removed = self.lock().prune(now, self.ttl_ms);
        if removed > 0 {
            debug!("Pruned {} expired cache entries", removed);
        }
        removed
    }

    // == Cache-Aside Helpers ==
    /// Returns the cached value, or computes, stores and returns it.
    pub fn get_or_insert_with<F>(&self, key: &str, compute: F) -> V
    where
        V: Clone,
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(key) {
            return value;
        }
        let value = compute();
        self.set(key, value.clone());
        value
    }

    /// Like [`TtlCache::get_or_insert_with`], but failures are returned to
    /// the caller and nothing is cached.
    pub fn try_get_or_insert_with<F, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        V: Clone,
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = compute()?;
        self.set(key, value.clone());
        Ok(value)
    }

    /// Async cache-aside for callers that fetch from upstream services.
    ///
    /// The lock is released while `fetch` runs, so concurrent misses may
    /// fetch the same key more than once.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &str, fetch: F) -> Result<V, E>
    where
        V: Clone,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = fetch().await?;
        self.set(key, value.clone());
        Ok(value)
    }

    // == Accessors ==
    /// Number of entries held in memory, including expired ones not yet evicted.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn is_persistent(&self) -> bool {
        self.persistence.is_some()
    }

    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }
}

impl<V, C> fmt::Debug for TtlCache<V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field(
                "persistence",
                &self.persistence.as_ref().map(|store| store.location()),
            )
            .finish_non_exhaustive()
    }
}
