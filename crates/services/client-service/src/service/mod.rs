//! Service layer - client use cases.

mod client_service;

pub use client_service::{ClientManager, ClientService};
