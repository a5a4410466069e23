//! Repository layer for data access.

mod cached;
mod client_repository;
pub mod entities;

pub use cached::{CacheSettings, CachedClientRepository};
pub use client_repository::{ClientRepository, ClientStore};

#[cfg(any(test, feature = "test-utils"))]
pub use client_repository::MockClientRepository;
