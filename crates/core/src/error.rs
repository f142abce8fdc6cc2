//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, conflicts). Infrastructure concerns belong elsewhere.
///
/// Settlement-specific conditions get their own named variants so callers can
/// surface a precise message instead of pattern-matching on strings.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A domain invariant was violated.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found (domain-level).
    #[error("not found: {0}")]
    NotFound(String),

    /// A conflict occurred (e.g. stale version / optimistic concurrency).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Valuation asked for a date before the item's purchase date.
    #[error("valuation date {as_of} precedes purchase date {purchase}")]
    InvalidDate { as_of: String, purchase: String },

    /// Depreciation rate outside `[0, 1]`.
    #[error("yearly depreciation {0} is outside [0, 1]")]
    InvalidRate(f64),

    /// Buy-in target already co-owns the item.
    #[error("user already owns this item")]
    AlreadyOwner,

    /// Buy-out target does not co-own the item.
    #[error("user does not own this item")]
    NotOwner,

    /// Move-in target already resides in a flat.
    #[error("user is already housed in a flat")]
    AlreadyHoused,

    /// Move-out target does not reside in the given flat.
    #[error("user is not a resident of this flat")]
    NotResident,

    /// Move-out would leave the flat with no residents.
    #[error("user is the last resident of the flat")]
    LastResident,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}
