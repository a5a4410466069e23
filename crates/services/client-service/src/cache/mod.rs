//! Distributed cache access for client data.
//!
//! The [`CacheBackend`] trait is deliberately byte-oriented; encoding lives in
//! [`record`] so the backend never needs to know about domain types.

mod record;
mod redis_cache;

use std::time::Duration;

use async_trait::async_trait;

use common::{AppError, AppResult};

pub use record::ClientCacheRecord;
pub use redis_cache::RedisCache;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Cache key prefix for client data
pub const CACHE_PREFIX_CLIENT: &str = "client:";

/// Build the cache key for a client ID.
pub fn client_cache_key(id: i64) -> String {
    format!("{}{}", CACHE_PREFIX_CLIENT, id)
}

/// Key/value cache with per-entry expiry.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Get raw bytes stored under `key`
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>>;

    /// Store raw bytes under `key`, expiring after `ttl`
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> AppResult<()>;
}

/// Stand-in used when the cache could not be reached at startup.
///
/// Every call fails, so the caching decorator falls back to the store.
#[derive(Debug, Clone, Default)]
pub struct DisconnectedCache;

#[async_trait]
impl CacheBackend for DisconnectedCache {
    async fn get(&self, _key: &str) -> AppResult<Option<Vec<u8>>> {
        Err(AppError::internal("Cache is not connected"))
    }

    async fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> AppResult<()> {
        Err(AppError::internal("Cache is not connected"))
    }
}
