//! Content cache collaborator
//!
//! The repository only needs `get` and `set` with a time-to-live. Expiry is
//! the cache's business: moka's housekeeping drops expired entries on its
//! own, whether or not the key is ever read again.

use crate::fetch::WebContent;
use moka::sync::Cache;
use moka::Expiry;
use std::time::{Duration, Instant};

/// Upper bound on cached pages
const MAX_CACHED_PAGES: u64 = 10_000;

/// Longest TTL handed to the cache; larger values are clamped
const MAX_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Key/value store for downloaded content with per-entry expiry
pub trait ContentCache: Send + Sync {
    fn get(&self, key: &str) -> Option<WebContent>;

    fn set(&self, key: &str, value: WebContent, ttl: Duration);
}

#[derive(Debug, Clone)]
struct CacheEntry {
    content: WebContent,
    ttl: Duration,
}

/// Gives every entry the TTL it was stored with
struct PerEntryTtl;

impl Expiry<String, CacheEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(entry.ttl.min(MAX_TTL))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &CacheEntry,
        _updated_at: Instant,
        _remaining: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl.min(MAX_TTL))
    }
}

/// Process-local [`ContentCache`] backed by `moka`
#[derive(Clone)]
pub struct MemoryCache {
    entries: Cache<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(MAX_CACHED_PAGES)
                .expire_after(PerEntryTtl)
                .build(),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCache for MemoryCache {
    fn get(&self, key: &str) -> Option<WebContent> {
        self.entries.get(key).map(|entry| entry.content)
    }

    fn set(&self, key: &str, value: WebContent, ttl: Duration) {
        let entry = CacheEntry {
            content: value,
            ttl,
        };
        self.entries.insert(key.to_string(), entry);
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
