//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! The client service and its cache bridge build on the types defined here.

pub mod client;
pub mod cnpj;
pub mod constants;
pub mod error;

pub use client::{Client, ClientDetails, ClientParts};
pub use cnpj::{Cnpj, CnpjError};
pub use constants::*;
pub use error::{DomainError, DomainResult};
