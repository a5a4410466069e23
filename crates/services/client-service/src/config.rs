//! Client service configuration.

use std::env;
use std::time::Duration;

use common::{CacheConfig, DatabaseConfig};

/// Client service configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientServiceConfig {
    /// Relational store settings
    pub database: DatabaseConfig,
    /// Redis cache settings
    pub cache: CacheConfig,
}

impl ClientServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database_defaults = DatabaseConfig::default();
        let cache_defaults = CacheConfig::default();

        Self {
            database: DatabaseConfig {
                url: env::var("CLIENT_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(database_defaults.url),
                max_connections: parse_var("CLIENT_SERVICE_DB_MAX_CONNECTIONS")
                    .unwrap_or(database_defaults.max_connections),
                min_connections: parse_var("CLIENT_SERVICE_DB_MIN_CONNECTIONS")
                    .unwrap_or(database_defaults.min_connections),
            },
            cache: CacheConfig {
                url: env::var("CLIENT_SERVICE_REDIS_URL")
                    .or_else(|_| env::var("REDIS_URL"))
                    .unwrap_or(cache_defaults.url),
                default_ttl_seconds: parse_var("CLIENT_SERVICE_CACHE_TTL_SECONDS")
                    .unwrap_or(cache_defaults.default_ttl_seconds),
                timeout_ms: parse_var("CLIENT_SERVICE_CACHE_TIMEOUT_MS")
                    .unwrap_or(cache_defaults.timeout_ms),
            },
        }
    }

    /// Cache entry time-to-live
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.default_ttl_seconds)
    }

    /// Per-operation cache budget
    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache.timeout_ms)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
