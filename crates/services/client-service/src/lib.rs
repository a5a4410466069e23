//! Client Service Library
//!
//! Client registration and lookup over a relational store fronted by a
//! Redis cache-aside layer.

pub mod cache;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::{CacheBackend, DisconnectedCache, RedisCache};
use crate::config::ClientServiceConfig;
use crate::infra::Database;
use crate::repository::{CacheSettings, CachedClientRepository, ClientStore};
use crate::service::{ClientManager, ClientService};

/// Shared handles for one process.
///
/// Built once at startup and passed by reference; the database pool and the
/// cache connection are cloned into the repositories, never reopened.
pub struct ServiceContext {
    database: Database,
    service: Arc<dyn ClientService>,
}

impl ServiceContext {
    /// Connect to the store and cache and wire the service.
    ///
    /// A cache that cannot be reached only degrades reads to the store; a
    /// database that cannot be reached is fatal.
    pub async fn init(config: &ClientServiceConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let database = Database::connect(&config.database).await?;

        let cache: Arc<dyn CacheBackend> = match RedisCache::connect(&config.cache.url).await {
            Ok(cache) => Arc::new(cache),
            Err(e) => {
                warn!(error = %e, "Redis unavailable, serving clients from the store only");
                Arc::new(DisconnectedCache)
            }
        };

        let settings = CacheSettings {
            ttl: config.cache_ttl(),
            timeout: config.cache_timeout(),
        };
        let store = Arc::new(ClientStore::new(database.get_connection()));
        let repo = Arc::new(CachedClientRepository::with_settings(store, cache, settings));
        let service = Arc::new(ClientManager::new(repo));

        info!("Client service initialized");
        Ok(Self { database, service })
    }

    /// Client use cases
    pub fn service(&self) -> Arc<dyn ClientService> {
        self.service.clone()
    }

    /// Release the database pool.
    pub async fn shutdown(self) -> Result<(), Box<dyn std::error::Error>> {
        drop(self.service);
        self.database.close().await?;
        Ok(())
    }
}
