//! Client service - Handles client-related business logic.

use async_trait::async_trait;
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{Client, Cnpj};

use crate::repository::ClientRepository;

/// Client service trait for dependency injection.
#[async_trait]
pub trait ClientService: Send + Sync {
    /// Validate and register a new client.
    ///
    /// Fails with a conflict if a client with the same CNPJ already exists.
    /// The check and the insert are separate calls; the store's unique index
    /// catches concurrent registrations that pass the check together.
    async fn create_client(&self, trade_name: &str, raw_cnpj: &str) -> AppResult<Client>;

    /// Get client by ID
    async fn get_client(&self, id: i64) -> AppResult<Option<Client>>;

    /// List all clients
    async fn list_clients(&self) -> AppResult<Vec<Client>>;
}

/// Concrete implementation of ClientService using repository.
pub struct ClientManager {
    repo: Arc<dyn ClientRepository>,
}

impl ClientManager {
    /// Create new client service instance with repository
    pub fn new(repo: Arc<dyn ClientRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl ClientService for ClientManager {
    async fn create_client(&self, trade_name: &str, raw_cnpj: &str) -> AppResult<Client> {
        if trade_name.trim().is_empty() {
            return Err(AppError::validation("Trade name is required"));
        }

        if raw_cnpj.trim().is_empty() {
            return Err(AppError::validation("CNPJ is required"));
        }

        let cnpj = Cnpj::parse(raw_cnpj)?;
        let client = Client::new(trade_name, cnpj)?;

        // Check if CNPJ already exists
        if self.repo.find_by_cnpj(client.cnpj()).await?.is_some() {
            return Err(AppError::conflict(format!(
                "Client with CNPJ {}",
                client.cnpj()
            )));
        }

        let created = self.repo.add(client).await?;

        tracing::info!(client_id = created.id(), cnpj = %created.cnpj(), "Client created");
        Ok(created)
    }

    async fn get_client(&self, id: i64) -> AppResult<Option<Client>> {
        self.repo.find_by_id(id).await
    }

    async fn list_clients(&self) -> AppResult<Vec<Client>> {
        self.repo.list().await
    }
}
