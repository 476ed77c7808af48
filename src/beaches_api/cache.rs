use dashmap::DashMap;
use serde_json::Value;
use std::time::{Duration, Instant};

struct CacheEntry {
    value: Value,
    stored_at: Instant,
}

/// Upstream responses keyed by endpoint and query.
///
/// Entries are never evicted; once past the TTL they are only served through
/// [`ResponseCache::get_stale`] when the upstream cannot be reached.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    pub fn get_fresh(&self, key: &str) -> Option<Value> {
        self.entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn get_stale(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    pub fn put(&self, key: String, value: Value) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
