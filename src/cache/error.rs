use thiserror::Error;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache backend error: {0}")]
    Backend(String),
    #[error("cache payload could not be encoded or decoded: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("cache payload version {found} does not match expected version {expected}")]
    Version { found: u16, expected: u16 },
}

impl CacheError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        Self::Backend(err.to_string())
    }
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        Self::backend(err)
    }
}
