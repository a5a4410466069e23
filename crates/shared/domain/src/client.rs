//! Client aggregate.
//!
//! Fields are private; every change goes through a validating mutator that
//! stamps `updated_at`. Values loaded from storage or cache come back through
//! [`Client::rehydrate`], which re-checks the name but keeps the recorded id,
//! activation flag and timestamps.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cnpj::Cnpj;
use crate::constants::{MIN_TRADE_NAME_LENGTH, UNASSIGNED_CLIENT_ID};
use crate::error::{DomainError, DomainResult};

/// Client domain entity
#[derive(Debug, Clone, PartialEq)]
pub struct Client {
    id: i64,
    trade_name: String,
    cnpj: Cnpj,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

/// Previously validated field values used to rebuild a [`Client`].
#[derive(Debug, Clone)]
pub struct ClientParts {
    pub id: i64,
    pub trade_name: String,
    pub cnpj: Cnpj,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Client {
    /// Create a new, not yet persisted, active client.
    ///
    /// # Errors
    /// Returns a validation error if the trimmed trade name is empty or
    /// shorter than the minimum length.
    pub fn new(trade_name: impl Into<String>, cnpj: Cnpj) -> DomainResult<Self> {
        let now = Utc::now();
        Ok(Self {
            id: UNASSIGNED_CLIENT_ID,
            trade_name: validate_trade_name(trade_name.into())?,
            cnpj,
            active: true,
            created_at: now,
            updated_at: Some(now),
        })
    }

    /// Rebuild a client from trusted storage without stamping timestamps.
    ///
    /// The trade name still goes through the same validation as [`Client::new`],
    /// so a corrupted payload is rejected instead of producing an invalid client.
    pub fn rehydrate(parts: ClientParts) -> DomainResult<Self> {
        Ok(Self {
            id: parts.id,
            trade_name: validate_trade_name(parts.trade_name)?,
            cnpj: parts.cnpj,
            active: parts.active,
            created_at: parts.created_at,
            updated_at: parts.updated_at,
        })
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn trade_name(&self) -> &str {
        &self.trade_name
    }

    pub fn cnpj(&self) -> &Cnpj {
        &self.cnpj
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Check if the store has assigned an id
    pub fn is_persisted(&self) -> bool {
        self.id != UNASSIGNED_CLIENT_ID
    }

    /// Rename the client
    pub fn set_trade_name(&mut self, trade_name: impl Into<String>) -> DomainResult<()> {
        self.trade_name = validate_trade_name(trade_name.into())?;
        self.touch();
        Ok(())
    }

    /// Replace the client's CNPJ
    pub fn change_cnpj(&mut self, cnpj: Cnpj) {
        self.cnpj = cnpj;
        self.touch();
    }

    /// Mark the client as active
    pub fn activate(&mut self) {
        self.active = true;
        self.touch();
    }

    /// Mark the client as inactive
    pub fn deactivate(&mut self) {
        self.active = false;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

fn validate_trade_name(trade_name: String) -> DomainResult<String> {
    let trimmed = trade_name.trim();

    if trimmed.is_empty() {
        return Err(DomainError::validation("Trade name must not be empty"));
    }

    if trimmed.chars().count() < MIN_TRADE_NAME_LENGTH {
        return Err(DomainError::validation(format!(
            "Trade name must be at least {} characters",
            MIN_TRADE_NAME_LENGTH
        )));
    }

    Ok(trimmed.to_string())
}

/// Client response (safe to return to callers)
#[derive(Debug, Clone, Serialize)]
pub struct ClientDetails {
    /// Store-assigned identifier
    pub id: i64,
    /// Trade name
    pub trade_name: String,
    /// CNPJ in `NN.NNN.NNN/NNNN-NN` form
    pub cnpj: String,
    /// Activation flag
    pub active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&Client> for ClientDetails {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id,
            trade_name: client.trade_name.clone(),
            cnpj: client.cnpj.formatted(),
            active: client.active,
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

impl From<Client> for ClientDetails {
    fn from(client: Client) -> Self {
        ClientDetails::from(&client)
    }
}
