//! Lazily expiring key/value store.
//!
//! [`TtlCache`] keeps each value alongside its own expiry instant. Expired
//! entries are never returned: a read that finds one evicts it on the spot.
//! Nothing is removed proactively unless [`TtlCache::sweep()`] is called,
//! either by the owner or by the task started with
//! [`TtlCache::spawn_sweeper()`].
//!
//! The whole map sits behind a single `RwLock`. Lookups take the read lock,
//! inserts, evictions and sweeps take the write lock. Two requests racing on
//! the same key resolve as last-writer-wins; values for a key are expected to
//! be interchangeable, so either observation is fine.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::telemetry;

/// A cached value and the instant it stops being readable.
#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Entry counts reported by [`TtlCache::status()`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheStatus {
    pub total_entries: usize,
    pub active_entries: usize,
    pub expired_entries: usize,
}

/// Thread-safe string-keyed cache with per-entry time-to-live.
///
/// No size bound and no LRU: growth is limited only by expiry plus sweeps.
pub struct TtlCache<V> {
    name: &'static str,
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    /// Create an empty cache. `name` labels its metrics and log lines.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Cache name as given at construction.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Look up a live value.
    ///
    /// An expired entry is evicted and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entries = self.read();
            match entries.get(key) {
                Some(entry) if entry.is_live(now) => {
                    metrics::counter!(telemetry::CACHE_HITS_TOTAL, "cache" => self.name)
                        .increment(1);
                    return Some(entry.value.clone());
                }
                Some(_) => {}
                None => {
                    metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "cache" => self.name)
                        .increment(1);
                    return None;
                }
            }
        }

        // Re-check under the write lock: a put may have refreshed the key
        // between releasing the read lock and acquiring this one.
        let mut entries = self.write();
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
            debug!(cache = self.name, key, "evicted expired entry");
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "cache" => self.name).increment(1);
        None
    }

    /// Insert or overwrite `key`, readable for `ttl` from now.
    pub fn put(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.write().insert(key.into(), entry);
    }

    /// Remove every expired entry. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        let removed = before - entries.len();
        if removed > 0 {
            metrics::counter!(telemetry::CACHE_SWEPT_TOTAL, "cache" => self.name)
                .increment(removed as u64);
            debug!(cache = self.name, removed, "swept expired entries");
        }
        removed
    }

    /// Count total, live and expired entries (full scan).
    pub fn status(&self) -> CacheStatus {
        let now = Instant::now();
        let entries = self.read();
        let active_entries = entries.values().filter(|e| e.is_live(now)).count();
        CacheStatus {
            total_entries: entries.len(),
            active_entries,
            expired_entries: entries.len() - active_entries,
        }
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Sweep this cache every `period` on the current tokio runtime.
    ///
    /// The task holds only a weak reference and exits once the cache is
    /// dropped. Abort the returned handle to stop it earlier.
    pub fn spawn_sweeper(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = cache.upgrade() else {
                    break;
                };
                cache.sweep();
            }
        })
    }
}
