//! Cache storage backends.
//!
//! A backend is a plain byte store: get, set with optional TTL, delete by
//! key, and flush. Encoding and error tolerance live in `CatalogCache`.

use std::sync::RwLock;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use lru::LruCache;
use metrics::counter;

use super::config::CacheConfig;
use super::error::CacheError;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";
pub(crate) const METRIC_CACHE_EVICT: &str = "carta_cache_evict_total";

#[async_trait]
pub trait CacheStore: Send + Sync {
    fn backend(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError>;

    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> Result<(), CacheError>;

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError>;

    /// Remove every entry this store owns.
    async fn flush(&self) -> Result<(), CacheError>;
}

// ============================================================================
// Memory store
// ============================================================================

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: Bytes,
    expires_at: Option<Instant>,
}

impl MemoryEntry {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| deadline <= now)
    }
}

/// Bounded in-process store with LRU eviction.
pub struct MemoryStore {
    entries: RwLock<LruCache<String, MemoryEntry>>,
}

impl MemoryStore {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(config.capacity_non_zero())),
        }
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let mut entries = rw_write(&self.entries, SOURCE, "get");
        let expired = match entries.get(key) {
            None => return Ok(None),
            Some(entry) if !entry.is_expired(Instant::now()) => {
                return Ok(Some(entry.value.clone()));
            }
            Some(_) => true,
        };
        if expired {
            entries.pop(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> Result<(), CacheError> {
        let entry = MemoryEntry {
            value,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        };
        let mut entries = rw_write(&self.entries, SOURCE, "set");
        let displaced = entries.push(key.to_string(), entry);
        if displaced.is_some_and(|(evicted, _)| evicted != key) {
            counter!(METRIC_CACHE_EVICT, "backend" => "memory").increment(1);
        }
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        let mut entries = rw_write(&self.entries, SOURCE, "delete");
        for key in keys {
            entries.pop(key.as_str());
        }
        Ok(())
    }

    async fn flush(&self) -> Result<(), CacheError> {
        rw_write(&self.entries, SOURCE, "flush").clear();
        Ok(())
    }
}

// ============================================================================
// No-op store
// ============================================================================

/// Store used when caching is disabled: every read misses, every write succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStore;

#[async_trait]
impl CacheStore for NoopStore {
    fn backend(&self) -> &'static str {
        "disabled"
    }

    async fn get(&self, _key: &str) -> Result<Option<Bytes>, CacheError> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &str,
        _value: Bytes,
        _ttl: Option<Duration>,
    ) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _keys: &[String]) -> Result<(), CacheError> {
        Ok(())
    }

    async fn flush(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
