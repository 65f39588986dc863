//! Cache configuration.
//!
//! Controls the response cache backend via the `[cache]` table of `carta.toml`.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_CAPACITY: usize = 1024;
const DEFAULT_NAMESPACE: &str = "carta";

/// Where cached responses live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CacheBackend {
    /// In-process LRU map.
    #[default]
    Memory,
    /// Shared Redis instance.
    Redis,
    /// Every lookup misses.
    Disabled,
}

/// When invalidation runs relative to the response of the mutating request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvalidationMode {
    /// Awaited before the response is returned.
    #[default]
    Inline,
    /// Spawned onto the runtime; the response does not wait for it.
    Background,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,
    /// Connection URL, required for the Redis backend.
    pub redis_url: Option<String>,
    /// Prefix for every key written to a shared backend.
    pub namespace: String,
    /// Maximum entries held by the memory backend.
    pub capacity: usize,
    /// Entry lifetime in seconds; zero keeps entries until invalidated.
    pub ttl_seconds: u64,
    pub invalidation: InvalidationMode,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            redis_url: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            capacity: DEFAULT_CAPACITY,
            ttl_seconds: 0,
            invalidation: InvalidationMode::Inline,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            backend: settings.backend,
            redis_url: settings.redis_url.clone(),
            namespace: settings.namespace.clone(),
            capacity: settings.capacity.get(),
            ttl_seconds: settings.ttl_seconds,
            invalidation: settings.invalidation,
        }
    }
}

impl CacheConfig {
    /// Returns the capacity as NonZeroUsize, clamping to 1 if zero.
    pub fn capacity_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.capacity).unwrap_or(NonZeroUsize::MIN)
    }

    pub fn ttl(&self) -> Option<Duration> {
        (self.ttl_seconds > 0).then(|| Duration::from_secs(self.ttl_seconds))
    }
}
