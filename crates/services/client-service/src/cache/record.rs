//! Flat cache representation of a client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use common::{AppError, AppResult};
use domain::{Client, ClientParts, Cnpj, DomainResult};

/// Cached client payload, stored as JSON.
///
/// `identifier` holds the normalized 14 digits; formatting is never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientCacheRecord {
    pub id: i64,
    pub trade_name: String,
    pub identifier: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ClientCacheRecord {
    /// Serialize a client to cache bytes.
    pub fn encode(client: &Client) -> AppResult<Vec<u8>> {
        serde_json::to_vec(&Self::from(client))
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))
    }

    /// Rebuild a client from cache bytes.
    ///
    /// Returns `None` for anything that does not decode into a valid client,
    /// so callers can treat a damaged entry exactly like a miss.
    pub fn decode(bytes: &[u8]) -> Option<Client> {
        let record: Self = match serde_json::from_slice(bytes) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to deserialize cached client");
                return None;
            }
        };

        let id = record.id;
        match record.into_client() {
            Ok(client) => Some(client),
            Err(e) => {
                tracing::warn!(client_id = id, error = %e, "Cached client failed validation");
                None
            }
        }
    }

    /// Rebuild the aggregate, re-validating the CNPJ and trade name.
    pub fn into_client(self) -> DomainResult<Client> {
        Client::rehydrate(ClientParts {
            id: self.id,
            trade_name: self.trade_name,
            cnpj: Cnpj::parse(&self.identifier)?,
            active: self.active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl From<&Client> for ClientCacheRecord {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id(),
            trade_name: client.trade_name().to_string(),
            identifier: client.cnpj().as_str().to_string(),
            active: client.is_active(),
            created_at: client.created_at(),
            updated_at: client.updated_at(),
        }
    }
}
