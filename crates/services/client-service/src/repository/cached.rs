//! Cache-aside decorator for [`ClientRepository`].
//!
//! Reads by ID try the cache first and fall back to the wrapped store,
//! populating the cache on the way out. Adds go to the store first and are
//! then written to the cache. Lookups by CNPJ and listing are not cached.
//!
//! Cache failures of any kind (connection errors, timeouts, unreadable
//! entries) are logged and swallowed; only store errors reach the caller.
//! Entries are not invalidated on updates made outside this repository, so a
//! cached client may be stale for up to one TTL.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, warn};

use common::{AppResult, DEFAULT_CACHE_TIMEOUT_MS, DEFAULT_CACHE_TTL_SECONDS};
use domain::{Client, Cnpj};

use super::ClientRepository;
use crate::cache::{client_cache_key, CacheBackend, ClientCacheRecord};

/// Cache timing settings.
#[derive(Debug, Clone, Copy)]
pub struct CacheSettings {
    /// Entry time-to-live
    pub ttl: Duration,
    /// Budget for a single cache call
    pub timeout: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECONDS),
            timeout: Duration::from_millis(DEFAULT_CACHE_TIMEOUT_MS),
        }
    }
}

/// Repository decorator adding a read/write-through cache.
pub struct CachedClientRepository {
    inner: Arc<dyn ClientRepository>,
    cache: Arc<dyn CacheBackend>,
    settings: CacheSettings,
}

impl CachedClientRepository {
    /// Wrap a repository with default cache settings
    pub fn new(inner: Arc<dyn ClientRepository>, cache: Arc<dyn CacheBackend>) -> Self {
        Self::with_settings(inner, cache, CacheSettings::default())
    }

    /// Wrap a repository with explicit cache settings
    pub fn with_settings(
        inner: Arc<dyn ClientRepository>,
        cache: Arc<dyn CacheBackend>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            inner,
            cache,
            settings,
        }
    }

    async fn read_cached(&self, id: i64) -> Option<Client> {
        let key = client_cache_key(id);

        let bytes = match timeout(self.settings.timeout, self.cache.get(&key)).await {
            Ok(Ok(Some(bytes))) => bytes,
            Ok(Ok(None)) => {
                debug!(key = %key, "Cache miss");
                return None;
            }
            Ok(Err(e)) => {
                warn!(key = %key, error = ?e, "Cache read failed, falling back to store");
                return None;
            }
            Err(_) => {
                warn!(
                    key = %key,
                    timeout_ms = self.settings.timeout.as_millis() as u64,
                    "Cache read timed out, falling back to store"
                );
                return None;
            }
        };

        match ClientCacheRecord::decode(&bytes) {
            Some(client) if client.id() == id => {
                debug!(key = %key, "Cache hit");
                Some(client)
            }
            Some(client) => {
                warn!(key = %key, cached_id = client.id(), "Cache entry holds another client");
                None
            }
            None => {
                warn!(key = %key, "Discarding unreadable cache entry");
                None
            }
        }
    }

    async fn populate(&self, client: &Client) {
        let key = client_cache_key(client.id());

        let bytes = match ClientCacheRecord::encode(client) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(key = %key, error = ?e, "Skipping cache population");
                return;
            }
        };

        let write = self.cache.set(&key, &bytes, self.settings.ttl);
        match timeout(self.settings.timeout, write).await {
            Ok(Ok(())) => debug!(key = %key, "Cache populated"),
            Ok(Err(e)) => warn!(key = %key, error = ?e, "Cache write failed"),
            Err(_) => warn!(
                key = %key,
                timeout_ms = self.settings.timeout.as_millis() as u64,
                "Cache write timed out"
            ),
        }
    }
}

#[async_trait]
impl ClientRepository for CachedClientRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Client>> {
        if let Some(client) = self.read_cached(id).await {
            return Ok(Some(client));
        }

        let client = self.inner.find_by_id(id).await?;
        if let Some(client) = &client {
            self.populate(client).await;
        }

        Ok(client)
    }

    async fn find_by_cnpj(&self, cnpj: &Cnpj) -> AppResult<Option<Client>> {
        self.inner.find_by_cnpj(cnpj).await
    }

    async fn add(&self, client: Client) -> AppResult<Client> {
        let created = self.inner.add(client).await?;
        self.populate(&created).await;
        Ok(created)
    }

    async fn list(&self) -> AppResult<Vec<Client>> {
        self.inner.list().await
    }
}
