//! In-memory TTL cache for upstream API responses
//!
//! The key space is small and bounded (one key per distinct content query),
//! so there is no eviction beyond the staleness check at read time. Entries
//! are replaced wholesale on refresh, never mutated in place.

use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Parsed upstream response body plus the pagination metadata headers
#[derive(Clone, Debug, PartialEq)]
pub struct CachedPayload {
    pub body: Value,
    pub total: Option<u64>,
    pub total_pages: Option<u64>,
}

impl CachedPayload {
    pub fn new(body: Value) -> Self {
        Self {
            body,
            total: None,
            total_pages: None,
        }
    }
}

#[derive(Clone, Debug)]
struct CacheEntry {
    payload: CachedPayload,
    fetched_at: Instant,
}

/// Keyed response cache owned by a single client instance
#[derive(Debug)]
pub struct ResponseCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Entry younger than the TTL, if any
    pub fn fresh(&self, key: &str) -> Option<CachedPayload> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if entry.fetched_at.elapsed() < self.ttl {
            Some(entry.payload.clone())
        } else {
            None
        }
    }

    /// Entry of any age, for stale fallback after a failed refresh
    pub fn any(&self, key: &str) -> Option<CachedPayload> {
        self.entries.read().get(key).map(|entry| entry.payload.clone())
    }

    pub fn store(&self, key: &str, payload: CachedPayload) {
        let entry = CacheEntry {
            payload,
            fetched_at: Instant::now(),
        };
        self.entries.write().insert(key.to_string(), entry);
    }

    pub fn invalidate(&self, key: &str) {
        self.entries.write().remove(key);
    }

    pub fn purge(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
