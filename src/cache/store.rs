// In-memory cache store for fetched event feeds.
// One entry per subject, replaced wholesale on every refresh.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::github::EventRecord;

/// How long a fetched feed is served without asking GitHub again.
pub const DEFAULT_TTL: Duration = Duration::from_secs(180);

/// Case-insensitive subject identity. GitHub logins are case-insensitive,
/// so "Alice" and "alice" share a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(subject: &str) -> Self {
        Self(subject.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cached feed with freshness metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// When the feed was fetched or last confirmed unchanged.
    pub fetched_at: DateTime<Utc>,
    /// Events in upstream order.
    pub payload: Arc<Vec<EventRecord>>,
    /// ETag from page 1, used for the next conditional request.
    pub validator: Option<String>,
}

impl CacheEntry {
    pub fn new(
        fetched_at: DateTime<Utc>,
        payload: Arc<Vec<EventRecord>>,
        validator: Option<String>,
    ) -> Self {
        Self {
            fetched_at,
            payload,
            validator,
        }
    }

    /// Check if the entry is still within `ttl` at time `now`.
    ///
    /// A `fetched_at` in the future (clock stepped backwards) counts as stale.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at)
            .to_std()
            .map(|elapsed| elapsed < ttl)
            .unwrap_or(false)
    }
}

/// Concurrent map from subject to cached feed.
///
/// No eviction: entries live as long as the store.
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: DashMap<CacheKey, CacheEntry>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the entry for `key`.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Replace whatever is stored for `key`.
    pub fn put(&self, key: CacheKey, entry: CacheEntry) {
        self.entries.insert(key, entry);
    }

    /// Number of subjects with a cached feed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry_at(fetched_at: DateTime<Utc>, validator: Option<&str>) -> CacheEntry {
        CacheEntry::new(fetched_at, Arc::new(Vec::new()), validator.map(String::from))
    }

    #[test]
    fn test_key_is_case_insensitive() {
        assert_eq!(CacheKey::new("Alice"), CacheKey::new("alice"));
        assert_eq!(CacheKey::new(" ALICE "), CacheKey::new("alice"));
        assert_eq!(CacheKey::new("Alice").as_str(), "alice");
        assert_ne!(CacheKey::new("alice"), CacheKey::new("bob"));
    }

    #[test]
    fn test_fresh_within_ttl() {
        let now = Utc::now();
        let entry = entry_at(now - chrono::Duration::seconds(60), None);

        assert!(entry.is_fresh(DEFAULT_TTL, now));
    }

    #[test]
    fn test_stale_at_and_after_ttl() {
        let now = Utc::now();

        let at_ttl = entry_at(now - chrono::Duration::seconds(180), None);
        assert!(!at_ttl.is_fresh(DEFAULT_TTL, now));

        let past_ttl = entry_at(now - chrono::Duration::seconds(200), None);
        assert!(!past_ttl.is_fresh(DEFAULT_TTL, now));
    }

    #[test]
    fn test_future_timestamp_is_stale() {
        let now = Utc::now();
        let entry = entry_at(now + chrono::Duration::seconds(5), None);

        assert!(!entry.is_fresh(DEFAULT_TTL, now));
    }

    #[test]
    fn test_put_overwrites() {
        let store = CacheStore::new();
        let key = CacheKey::new("alice");
        let now = Utc::now();

        assert!(store.get(&key).is_none());

        store.put(key.clone(), entry_at(now, Some("\"v1\"")));
        store.put(CacheKey::new("ALICE"), entry_at(now, Some("\"v2\"")));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&key).unwrap().validator.as_deref(), Some("\"v2\""));
    }

    #[test]
    fn test_concurrent_puts_keep_one_entry_per_key() {
        let store = Arc::new(CacheStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let key = CacheKey::new(if i % 2 == 0 { "alice" } else { "bob" });
                        store.put(key, entry_at(Utc::now(), None));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 2);
    }
}
