//! Redis-backed cache store.
//!
//! Keys are written as `{namespace}:{key}`. Flushing removes only keys under
//! the namespace, iterating with `SCAN` so the server is never blocked.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use redis::aio::ConnectionManager;
use tracing::{debug, info};

use super::error::CacheError;
use super::store::CacheStore;

const SCAN_BATCH: usize = 500;

#[derive(Clone)]
pub struct RedisStore {
    connection: ConnectionManager,
    namespace: String,
}

impl RedisStore {
    /// Open a managed connection. The manager reconnects on its own after failures.
    pub async fn connect(url: &str, namespace: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;
        info!(
            target = "carta::cache::redis",
            namespace, "Connected to Redis cache"
        );
        Ok(Self {
            connection,
            namespace: namespace.to_string(),
        })
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{key}", self.namespace)
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    fn backend(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<Bytes>, CacheError> {
        let mut conn = self.connection.clone();
        let value: Option<Vec<u8>> = redis::cmd("GET")
            .arg(self.namespaced(key))
            .query_async(&mut conn)
            .await?;
        Ok(value.map(Bytes::from))
    }

    async fn set(&self, key: &str, value: Bytes, ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        let mut cmd = redis::cmd("SET");
        cmd.arg(self.namespaced(key)).arg(value.as_ref());
        if let Some(ttl) = ttl {
            cmd.arg("PX").arg(ttl.as_millis().max(1) as u64);
        }
        cmd.query_async::<()>(&mut conn).await?;
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection.clone();
        let namespaced: Vec<String> = keys.iter().map(|key| self.namespaced(key)).collect();
        redis::cmd("DEL")
            .arg(namespaced)
            .query_async::<()>(&mut conn)
            .await?;
        Ok(())
    }

    async fn flush(&self) -> Result<(), CacheError> {
        let mut conn = self.connection.clone();
        let pattern = format!("{}:*", self.namespace);
        let mut cursor: u64 = 0;
        let mut removed = 0usize;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            if !batch.is_empty() {
                removed += batch.len();
                redis::cmd("DEL")
                    .arg(batch)
                    .query_async::<()>(&mut conn)
                    .await?;
            }
            if next == 0 {
                break;
            }
            cursor = next;
        }
        debug!(
            target = "carta::cache::redis",
            namespace = %self.namespace,
            removed,
            "Flushed cache namespace"
        );
        Ok(())
    }
}
