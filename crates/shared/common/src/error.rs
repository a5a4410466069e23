//! Unified error handling for the service layer.
//!
//! Provides a single error type that callers can map to their own transport:
//! client-correctable errors keep their message, infrastructure errors are
//! reduced to a generic message and logged.

use domain::{CnpjError, DomainError};
use thiserror::Error;

/// Application error types.
#[derive(Error, Debug)]
pub enum AppError {
    // Resource errors
    #[error("Resource not found")]
    NotFound,

    #[error("{0} already exists")]
    Conflict(String),

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[cfg(feature = "database")]
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    #[cfg(feature = "cache")]
    #[error("Cache error")]
    Cache(#[from] redis::RedisError),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound => "NOT_FOUND",
            AppError::Conflict(_) => "CONFLICT",
            AppError::Validation(_) => "VALIDATION_ERROR",
            #[cfg(feature = "database")]
            AppError::Database(_) => "DATABASE_ERROR",
            #[cfg(feature = "cache")]
            AppError::Cache(_) => "CACHE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if the caller can fix the request and retry
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::NotFound | AppError::Conflict(_) | AppError::Validation(_)
        )
    }

    /// Get user-facing message (hides internal details)
    pub fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),
            AppError::Conflict(msg) => {
                if msg.ends_with("already exists") {
                    msg.clone()
                } else {
                    format!("{} already exists", msg)
                }
            }

            // Hide details for infrastructure errors
            #[cfg(feature = "database")]
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            #[cfg(feature = "cache")]
            AppError::Cache(e) => {
                tracing::error!("Cache error: {:?}", e);
                "A cache error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }
}

// =============================================================================
// Domain Error Conversion
// =============================================================================

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::InvalidCnpj(e) => AppError::from(e),
        }
    }
}

impl From<CnpjError> for AppError {
    fn from(err: CnpjError) -> Self {
        AppError::Validation(format!("Invalid CNPJ: {}", err))
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Convenience constructors
impl AppError {
    pub fn conflict(entity: impl Into<String>) -> Self {
        AppError::Conflict(entity.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_validation_keeps_message() {
        let err = AppError::from(DomainError::validation("Trade name must not be empty"));
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.user_message(), "Trade name must not be empty");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_every_domain_error_is_client_error() {
        let errors = [
            DomainError::validation("Trade name must not be empty"),
            DomainError::from(CnpjError::InvalidChecksum),
        ];

        for err in errors {
            let app = AppError::from(err);
            assert_eq!(app.code(), "VALIDATION_ERROR");
            assert!(app.is_client_error());
        }
    }

    #[test]
    fn test_cnpj_error_becomes_validation() {
        let err = AppError::from(CnpjError::InvalidChecksum);
        assert!(matches!(&err, AppError::Validation(msg) if msg.starts_with("Invalid CNPJ")));
    }

    #[test]
    fn test_conflict_message_not_duplicated() {
        assert_eq!(
            AppError::conflict("Client with CNPJ 01.775.634/0001-89").user_message(),
            "Client with CNPJ 01.775.634/0001-89 already exists"
        );
        assert_eq!(
            AppError::conflict("CNPJ already exists").user_message(),
            "CNPJ already exists"
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let err = AppError::internal("pool exhausted on shard 3");
        assert_eq!(err.user_message(), "An internal error occurred");
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_option_ext() {
        let missing: Option<i64> = None;
        assert!(matches!(missing.ok_or_not_found(), Err(AppError::NotFound)));
        assert_eq!(Some(7).ok_or_not_found().unwrap(), 7);
    }
}
