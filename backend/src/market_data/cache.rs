// ---------------------------------------------------------------------------
// ResponseCache -- TTL cache for upstream JSON bodies
// ---------------------------------------------------------------------------

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde_json::Value;

struct CacheEntry {
    stored_at: Instant,
    body: Value,
}

/// Thread-safe map of request key -> upstream body that expires entries
/// after a fixed time-to-live.
pub struct ResponseCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Return a clone of the cached body if it is still fresh.
    pub fn get(&self, key: &str) -> Option<Value> {
        let map = self.entries.read();
        map.get(key)
            .filter(|e| e.stored_at.elapsed() < self.ttl)
            .map(|e| e.body.clone())
    }

    /// Store `body` under `key`, evicting any expired entries on the way.
    pub fn insert(&self, key: impl Into<String>, body: Value) {
        let mut map = self.entries.write();
        let ttl = self.ttl;
        map.retain(|_, e| e.stored_at.elapsed() < ttl);
        map.insert(
            key.into(),
            CacheEntry {
                stored_at: Instant::now(),
                body,
            },
        );
    }

    /// Number of entries currently held (fresh or not yet evicted).
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }
}
