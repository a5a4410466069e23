//! In-memory fakes for exercising repository and service behaviour.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use common::{AppError, AppResult};
use domain::{Client, ClientParts, Cnpj};

use crate::cache::CacheBackend;
use crate::repository::ClientRepository;

/// Cache fake that keeps entries in a map and ignores expiry.
#[derive(Default)]
pub struct InMemoryCache {
    entries: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an entry directly, bypassing the trait.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    /// Seed an entry directly.
    pub fn insert(&self, key: &str, value: Vec<u8>) {
        self.entries.lock().unwrap().insert(key.to_string(), value);
    }
}

#[async_trait]
impl CacheBackend for InMemoryCache {
    async fn get(&self, key: &str) -> AppResult<Option<Vec<u8>>> {
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: &[u8], _ttl: Duration) -> AppResult<()> {
        self.insert(key, value.to_vec());
        Ok(())
    }
}

/// Store fake with sequential IDs and a unique CNPJ constraint.
#[derive(Default)]
pub struct InMemoryStore {
    clients: Mutex<Vec<Client>>,
    find_by_id_calls: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `find_by_id` calls that reached the store
    pub fn find_by_id_calls(&self) -> usize {
        self.find_by_id_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClientRepository for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Client>> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        let clients = self.clients.lock().unwrap();
        Ok(clients.iter().find(|c| c.id() == id).cloned())
    }

    async fn find_by_cnpj(&self, cnpj: &Cnpj) -> AppResult<Option<Client>> {
        let clients = self.clients.lock().unwrap();
        Ok(clients.iter().find(|c| c.cnpj() == cnpj).cloned())
    }

    async fn add(&self, client: Client) -> AppResult<Client> {
        let mut clients = self.clients.lock().unwrap();

        if clients.iter().any(|c| c.cnpj() == client.cnpj()) {
            return Err(AppError::conflict(format!(
                "Client with CNPJ {}",
                client.cnpj()
            )));
        }

        let stored = Client::rehydrate(ClientParts {
            id: clients.len() as i64 + 1,
            trade_name: client.trade_name().to_string(),
            cnpj: client.cnpj().clone(),
            active: client.is_active(),
            created_at: client.created_at(),
            updated_at: client.updated_at(),
        })?;

        clients.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> AppResult<Vec<Client>> {
        Ok(self.clients.lock().unwrap().clone())
    }
}
