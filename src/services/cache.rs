//! In-memory expiring response cache
//!
//! Keys are the exact namespace+filter+page+limit tuple; values are whole
//! serialized response envelopes, so a hit is served byte-for-byte with its
//! original pagination metadata. The cache is process-local and best-effort:
//! an expired or missing entry is simply a miss, and lookups cannot fail.
//!
//! Entries are immutable once set (overwritten wholesale, never mutated in
//! place). Expired entries become misses immediately; the background sweep
//! in services/cleanup.rs reclaims their memory.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

struct CacheEntry {
    value: Value,
    expires_at: Instant,
}

/// Process-local TTL cache keyed by namespaced strings
pub struct ResponseCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get a cached response; expired entries are misses
    pub async fn get(&self, key: &str) -> Option<Value> {
        let entries = self.entries.read().await;
        let entry = entries.get(key)?;

        if entry.expires_at <= Instant::now() {
            return None;
        }

        Some(entry.value.clone())
    }

    /// Store a response under the key for the given TTL
    pub async fn set(&self, key: &str, value: Value, ttl: Duration) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }

    /// Remove all keys starting with the prefix; returns how many were removed.
    /// Called by owning components after channel/EPG mutations so stale
    /// listings never outlive their TTL unnecessarily.
    pub async fn invalidate_prefix(&self, prefix: &str) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        before - entries.len()
    }

    /// Drop expired entries; returns how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.expires_at > now);
        before - entries.len()
    }

    /// Number of live + not-yet-swept entries
    pub async fn len(&self) -> usize {
        let entries = self.entries.read().await;
        entries.len()
    }
}

impl Default for ResponseCache {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ResponseCache {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_returns_identical_value_within_ttl() {
        let cache = ResponseCache::new();
        let envelope = json!({
            "success": true,
            "data": [1, 2],
            "pagination": {"page": 1, "limit": 2, "total": 5, "totalPages": 3}
        });

        cache.set("channels:k", envelope.clone(), Duration::from_secs(60)).await;

        let first = cache.get("channels:k").await.unwrap();
        let second = cache.get("channels:k").await.unwrap();
        assert_eq!(first, envelope);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_expired_entry_is_a_miss() {
        let cache = ResponseCache::new();
        cache.set("epg:now", json!(1), Duration::from_millis(10)).await;

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(cache.get("epg:now").await.is_none());

        // sweep reclaims the slot
        assert_eq!(cache.purge_expired().await, 1);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_invalidate_prefix_scopes_to_namespace() {
        let cache = ResponseCache::new();
        let ttl = Duration::from_secs(60);
        cache.set("channels:a", json!(1), ttl).await;
        cache.set("channels:b", json!(2), ttl).await;
        cache.set("epg:now", json!(3), ttl).await;

        let removed = cache.invalidate_prefix("channels:").await;
        assert_eq!(removed, 2);
        assert!(cache.get("channels:a").await.is_none());
        assert!(cache.get("epg:now").await.is_some());
    }

    #[tokio::test]
    async fn test_set_overwrites_wholesale() {
        let cache = ResponseCache::new();
        let ttl = Duration::from_secs(60);
        cache.set("k", json!({"v": 1}), ttl).await;
        cache.set("k", json!({"v": 2}), ttl).await;

        assert_eq!(cache.get("k").await.unwrap(), json!({"v": 2}));
        assert_eq!(cache.len().await, 1);
    }
}
