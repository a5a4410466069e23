//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Client
// =============================================================================

/// Minimum trade name length, counted in characters after trimming
pub const MIN_TRADE_NAME_LENGTH: usize = 3;

/// Id carried by a client that has not been persisted yet
pub const UNASSIGNED_CLIENT_ID: i64 = 0;

// =============================================================================
// CNPJ
// =============================================================================

/// Number of digits in a normalized CNPJ
pub const CNPJ_LENGTH: usize = 14;

/// Number of leading digits that feed the check digit calculation
pub const CNPJ_BASE_LENGTH: usize = 12;
