//! The catalog cache used by the entity services.
//!
//! All operations are best-effort: a backend or decoding failure is logged,
//! counted, and then treated as a miss (reads) or ignored (writes). The store
//! stays authoritative, so a failing cache only costs latency.
//!
//! Mutations are applied either inline, before the mutating request returns,
//! or by a single background worker that drains them in commit order. The
//! worker only deletes keys: a queued refresh could land after a newer write
//! and pin a stale entry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

use super::config::{CacheConfig, InvalidationMode};
use super::error::CacheError;
use super::invalidation::{CatalogMutation, InvalidationPlan};
use super::keys::CacheKey;
use super::payload::{self, CachePayload, Cacheable};
use super::store::{CacheStore, NoopStore};

pub(crate) const METRIC_CACHE_HIT: &str = "carta_cache_hit_total";
pub(crate) const METRIC_CACHE_MISS: &str = "carta_cache_miss_total";
pub(crate) const METRIC_CACHE_ERROR: &str = "carta_cache_error_total";
pub(crate) const METRIC_CACHE_INVALIDATE_MS: &str = "carta_cache_invalidate_ms";

/// Upper bound on mutations merged into one background plan.
const WORKER_BATCH: usize = 64;

/// An entry written right after an invalidation, e.g. the fresh copy of an updated menu.
#[derive(Debug, Clone)]
pub struct CacheRefresh {
    pub key: CacheKey,
    pub payload: CachePayload,
}

impl CacheRefresh {
    pub fn new<T: Cacheable>(key: CacheKey, value: &T) -> Self {
        Self {
            key,
            payload: value.to_payload(),
        }
    }
}

#[derive(Clone)]
enum Dispatch {
    Inline,
    Queue(mpsc::UnboundedSender<CatalogMutation>),
}

#[derive(Clone)]
pub struct CatalogCache {
    core: Arc<CacheCore>,
    dispatch: Dispatch,
}

impl CatalogCache {
    /// Build a cache over `store`. Background invalidation needs a running tokio
    /// runtime; without one the cache falls back to inline invalidation.
    pub fn new(store: Arc<dyn CacheStore>, config: &CacheConfig) -> Self {
        let core = Arc::new(CacheCore {
            store,
            ttl: config.ttl(),
        });

        let dispatch = match config.invalidation {
            InvalidationMode::Inline => Dispatch::Inline,
            InvalidationMode::Background => match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    let (sender, receiver) = mpsc::unbounded_channel();
                    handle.spawn(run_worker(core.clone(), receiver));
                    Dispatch::Queue(sender)
                }
                Err(_) => {
                    warn!(
                        target = "carta::cache",
                        "No async runtime for background invalidation; applying inline"
                    );
                    Dispatch::Inline
                }
            },
        };

        Self { core, dispatch }
    }

    /// A cache that never hits.
    pub fn disabled() -> Self {
        Self {
            core: Arc::new(CacheCore {
                store: Arc::new(NoopStore),
                ttl: None,
            }),
            dispatch: Dispatch::Inline,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.core.store.backend()
    }

    pub async fn get<T: Cacheable>(&self, key: &CacheKey) -> Option<T> {
        let core = &self.core;
        let category = key.category().as_str();
        let rendered = key.to_string();
        let bytes = match core.store.get(&rendered).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                counter!(METRIC_CACHE_MISS, "category" => category).increment(1);
                return None;
            }
            Err(err) => {
                core.report("get", &rendered, &err);
                counter!(METRIC_CACHE_MISS, "category" => category).increment(1);
                return None;
            }
        };

        let decoded = payload::decode(&bytes).and_then(|payload| {
            let kind = payload.kind();
            T::from_payload(payload).ok_or_else(|| {
                CacheError::backend(format!("unexpected payload kind `{kind}`"))
            })
        });

        match decoded {
            Ok(value) => {
                counter!(METRIC_CACHE_HIT, "category" => category).increment(1);
                Some(value)
            }
            Err(err) => {
                // Unreadable entries are dropped so the next read repopulates them.
                core.report("decode", &rendered, &err);
                counter!(METRIC_CACHE_MISS, "category" => category).increment(1);
                core.delete_keys(std::slice::from_ref(&rendered)).await;
                None
            }
        }
    }

    pub async fn set<T: Cacheable>(&self, key: &CacheKey, value: &T) {
        self.core.write_payload(key, &value.to_payload()).await;
    }

    pub async fn flush_all(&self) {
        if let Err(err) = self.core.store.flush().await {
            self.core.report("flush", "*", &err);
        }
    }

    /// Invalidate every key touched by `mutation`.
    ///
    /// Inline mode also writes `refresh` and returns once both are done. In
    /// background mode the mutation is queued and `refresh` is dropped.
    pub async fn apply(&self, mutation: CatalogMutation, refresh: Option<CacheRefresh>) {
        match &self.dispatch {
            Dispatch::Inline => self.core.execute_inline(mutation, refresh).await,
            Dispatch::Queue(sender) => {
                if let Err(rejected) = sender.send(mutation) {
                    // Worker gone (runtime shutting down): fall back to inline deletes.
                    self.core.execute_inline(rejected.0, None).await;
                }
            }
        }
    }
}

struct CacheCore {
    store: Arc<dyn CacheStore>,
    ttl: Option<Duration>,
}

impl CacheCore {
    #[instrument(skip(self, mutation, refresh), fields(mutation = mutation.name()))]
    async fn execute_inline(&self, mutation: CatalogMutation, refresh: Option<CacheRefresh>) {
        let started_at = Instant::now();
        let plan = InvalidationPlan::for_mutation(&mutation);
        self.execute_plan(&plan).await;

        if let Some(refresh) = refresh {
            self.write_payload(&refresh.key, &refresh.payload).await;
        }

        histogram!(METRIC_CACHE_INVALIDATE_MS, "mutation" => mutation.name())
            .record(started_at.elapsed().as_secs_f64() * 1000.0);
    }

    async fn execute_batch(&self, batch: &[CatalogMutation]) {
        let started_at = Instant::now();
        let plan = InvalidationPlan::from_mutations(batch);
        if plan.is_empty() {
            return;
        }
        self.execute_plan(&plan).await;

        let label = match batch {
            [single] => single.name(),
            _ => "batch",
        };
        histogram!(METRIC_CACHE_INVALIDATE_MS, "mutation" => label)
            .record(started_at.elapsed().as_secs_f64() * 1000.0);
    }

    async fn execute_plan(&self, plan: &InvalidationPlan) {
        if plan.flush {
            if let Err(err) = self.store.flush().await {
                self.report("flush", "*", &err);
            }
        }
        if !plan.keys.is_empty() {
            self.delete_keys(&plan.rendered_keys()).await;
        }
        debug!(%plan, backend = self.store.backend(), "Cache invalidation applied");
    }

    async fn delete_keys(&self, keys: &[String]) {
        if let Err(err) = self.store.delete(keys).await {
            self.report("delete", &keys.join(","), &err);
        }
    }

    async fn write_payload(&self, key: &CacheKey, payload: &CachePayload) {
        let rendered = key.to_string();
        let bytes = match payload::encode(payload) {
            Ok(bytes) => bytes,
            Err(err) => {
                self.report("encode", &rendered, &err);
                return;
            }
        };
        if let Err(err) = self.store.set(&rendered, bytes, self.ttl).await {
            self.report("set", &rendered, &err);
        }
    }

    fn report(&self, op: &'static str, key: &str, err: &CacheError) {
        counter!(METRIC_CACHE_ERROR, "op" => op).increment(1);
        warn!(
            target = "carta::cache",
            op,
            key,
            backend = self.store.backend(),
            error = %err,
            "Cache operation failed; continuing without cache"
        );
    }
}

/// Drain queued mutations in order, merging whatever is already waiting into one plan.
async fn run_worker(core: Arc<CacheCore>, mut receiver: mpsc::UnboundedReceiver<CatalogMutation>) {
    let mut batch = Vec::with_capacity(WORKER_BATCH);
    while let Some(first) = receiver.recv().await {
        batch.push(first);
        while batch.len() < WORKER_BATCH {
            match receiver.try_recv() {
                Ok(next) => batch.push(next),
                Err(_) => break,
            }
        }
        core.execute_batch(&batch).await;
        batch.clear();
    }
    debug!(target = "carta::cache", "Invalidation worker stopped");
}
