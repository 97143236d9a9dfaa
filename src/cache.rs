//! Process-local response cache with a fixed time-to-live.
//!
//! Entries are only hits while younger than the TTL. Reads never delete;
//! stale entries are swept by [`TtlCache::set`] once the map grows past its
//! ceiling, and only entries older than twice the TTL are removed. This is a
//! best-effort cap, not an LRU.

use dashmap::DashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// A cached value and the moment it was written.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Cached payload.
    pub payload: V,
    /// Write time.
    pub written_at: Instant,
}

/// Thread-safe TTL cache keyed by string.
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
    max_entries: usize,
}

impl<V: Clone> TtlCache<V> {
    /// Creates an empty cache.
    #[must_use]
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            max_entries,
        }
    }

    /// Returns the payload under `key` if it is younger than the TTL.
    pub fn get(&self, key: &str) -> Option<V> {
        let entry = self.entries.get(key)?;
        if entry.written_at.elapsed() < self.ttl {
            debug!(key, "cache hit");
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    /// Stores `payload` under `key`, then sweeps if the cache is over its ceiling.
    pub fn set(&self, key: impl Into<String>, payload: V) {
        self.entries.insert(
            key.into(),
            CacheEntry {
                payload,
                written_at: Instant::now(),
            },
        );

        if self.entries.len() > self.max_entries {
            self.evict_stale();
        }
    }

    /// Removes every entry older than twice the TTL.
    fn evict_stale(&self) {
        let horizon = self.ttl * 2;
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.written_at.elapsed() <= horizon);
        debug!(
            removed = before - self.entries.len(),
            remaining = self.entries.len(),
            "cache housekeeping"
        );
    }

    /// Number of stored entries, fresh or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Configured time-to-live.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache() -> TtlCache<u32> {
        TtlCache::new(Duration::from_secs(30), 100)
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_after_set_hits() {
        let cache = cache();
        cache.set("k", 7);
        assert_eq!(cache.get("k"), Some(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_missing_key() {
        let cache = cache();
        assert_eq!(cache.get("absent"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = cache();
        cache.set("k", 7);

        tokio::time::advance(Duration::from_secs(29)).await;
        assert_eq!(cache.get("k"), Some(7));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get("k"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_read_does_not_delete() {
        let cache = cache();
        cache.set("k", 7);
        tokio::time::advance(Duration::from_secs(45)).await;

        assert_eq!(cache.get("k"), None);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_refreshes_timestamp() {
        let cache = cache();
        cache.set("k", 1);
        tokio::time::advance(Duration::from_secs(25)).await;
        cache.set("k", 2);
        tokio::time::advance(Duration::from_secs(25)).await;

        assert_eq!(cache.get("k"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_housekeeping_removes_only_very_old_entries() {
        let cache = TtlCache::new(Duration::from_secs(30), 3);
        cache.set("old-1", 1);
        cache.set("old-2", 2);
        tokio::time::advance(Duration::from_secs(61)).await;

        cache.set("mid", 3);
        assert_eq!(cache.len(), 3);

        // Fourth entry pushes the count over the ceiling and triggers the sweep.
        cache.set("new", 4);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("mid"), Some(3));
        assert_eq!(cache.get("new"), Some(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_housekeeping_keeps_expired_but_recent_entries() {
        let cache = TtlCache::new(Duration::from_secs(30), 1);
        cache.set("a", 1);
        tokio::time::advance(Duration::from_secs(40)).await;
        cache.set("b", 2);

        // "a" is past the TTL but not past 2x TTL.
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), None);
    }
}
