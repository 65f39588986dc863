//! Catalog response cache.
//!
//! Services keep fully assembled responses (with their live counts) in a
//! key-value side cache keyed by `{category}:{identifier}`:
//!
//! - **Backends**: in-process LRU (`memory`), shared Redis (`redis`), or none (`disabled`)
//! - **Payloads**: versioned, tagged JSON envelopes
//! - **Coherence**: every write maps to an `InvalidationPlan` covering the entity,
//!   its collections and its ancestors
//!
//! ## Configuration
//!
//! ```toml
//! [cache]
//! backend = "memory"
//! capacity = 1024
//! ttl_seconds = 0
//! invalidation = "inline"
//! ```

mod config;
mod error;
mod invalidation;
mod keys;
mod layer;
mod lock;
mod payload;
mod redis_store;
mod store;

pub use config::{CacheBackend, CacheConfig, InvalidationMode};
pub use error::CacheError;
pub use invalidation::{CatalogMutation, InvalidationPlan};
pub use keys::{CacheCategory, CacheKey};
pub use layer::{CacheRefresh, CatalogCache};
pub use payload::{CachePayload, Cacheable, PAYLOAD_VERSION};
pub use redis_store::RedisStore;
pub use store::{CacheStore, MemoryStore, NoopStore};

pub(crate) use layer::{
    METRIC_CACHE_ERROR, METRIC_CACHE_HIT, METRIC_CACHE_INVALIDATE_MS, METRIC_CACHE_MISS,
};
pub(crate) use store::METRIC_CACHE_EVICT;
