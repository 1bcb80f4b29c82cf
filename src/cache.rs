// src/cache.rs
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-process response cache with per-entry TTL.
///
/// Entries are evicted lazily: an expired entry is removed on the first
/// `get` that observes it, never by a background sweeper. There is no
/// capacity bound and no single-flight de-duplication — two requests racing
/// on a cold key may both fetch upstream, and the last `set` wins. The cache
/// lives as long as the process; nothing is persisted.
pub struct ApiCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: Value,
    pub expires_at: DateTime<Utc>,
    pub stored_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub keys: Vec<String>,
}

impl ApiCache {
    pub fn new() -> Self {
        ApiCache {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached value if it has not expired. An expired entry is
    /// removed as a side effect and reported as a miss.
    pub fn get(&self, key: &str) -> Option<Value> {
        let expired = {
            let entries = self.entries.read().unwrap();
            match entries.get(key) {
                Some(entry) if Utc::now() < entry.expires_at => {
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            self.entries.write().unwrap().remove(key);
        }
        None
    }

    /// Stores a value under `key` for `ttl_seconds`, unconditionally
    /// overwriting any existing entry.
    pub fn set(&self, key: &str, value: Value, ttl_seconds: i64) {
        let now = Utc::now();
        let entry = CacheEntry {
            value,
            expires_at: now + Duration::seconds(ttl_seconds),
            stored_at: now,
        };
        self.entries.write().unwrap().insert(key.to_string(), entry);
    }

    /// Entry count plus the full key set. Diagnostics only — the key list is
    /// unbounded.
    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.read().unwrap();
        let mut keys: Vec<String> = entries.keys().cloned().collect();
        keys.sort();
        CacheStats {
            entries: entries.len(),
            keys,
        }
    }
}

impl Default for ApiCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_then_get_returns_value() {
        let cache = ApiCache::new();
        cache.set("games:E2025", json!({"total": 3}), 300);
        assert_eq!(cache.get("games:E2025"), Some(json!({"total": 3})));
    }

    #[test]
    fn expired_entry_is_a_miss_and_is_removed() {
        let cache = ApiCache::new();
        // A zero TTL expires by the time `get` observes the entry.
        cache.set("game:E2025:1", json!({"gameCode": 1}), 0);
        assert!(cache.get("game:E2025:1").is_none());
        assert_eq!(cache.stats().entries, 0);
        assert!(cache.stats().keys.is_empty());
    }

    #[test]
    fn set_overwrites_existing_entry() {
        let cache = ApiCache::new();
        cache.set("standings:E2025", json!({"rev": 1}), 300);
        cache.set("standings:E2025", json!({"rev": 2}), 300);
        assert_eq!(cache.get("standings:E2025"), Some(json!({"rev": 2})));
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn stats_lists_all_live_keys() {
        let cache = ApiCache::new();
        cache.set("a", json!(1), 60);
        cache.set("b", json!(2), 60);
        let stats = cache.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.keys, vec!["a".to_string(), "b".to_string()]);
    }
}
