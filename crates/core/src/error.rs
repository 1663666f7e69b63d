//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// lookups, stock invariants). Filesystem and format concerns belong to the
/// infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. malformed input, no data rows).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A requested finish or item does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Applying a delta would drive the quantity below zero.
    #[error(
        "insufficient stock for {item_no}: have {available}, change of {delta} would go below zero"
    )]
    InsufficientStock {
        item_no: String,
        available: i64,
        delta: i64,
    },

    /// A domain invariant was violated by stored data.
    #[error("invariant violated: {0}")]
    InvariantViolation(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn insufficient_stock(item_no: impl Into<String>, available: i64, delta: i64) -> Self {
        Self::InsufficientStock {
            item_no: item_no.into(),
            available,
            delta,
        }
    }
}
