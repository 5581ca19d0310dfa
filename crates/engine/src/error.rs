//! The module contains the errors the engine can report.
//!
//! Every operation surfaces one of these synchronously to its caller; the
//! engine never retries on its own. Messages are human-readable reasons; no
//! internal identifiers or stack traces leak past this boundary.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Listing, booking or wallet does not exist.
    #[error("not found: {0}")]
    NotFound(String),
    /// A transition was attempted from an illegal booking status.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Spot reservation failed: not enough free spots on the listing.
    #[error("insufficient capacity: {0}")]
    InsufficientCapacity(String),
    /// Wallet debit failed: balance lower than the requested amount.
    #[error("insufficient balance: {0}")]
    InsufficientBalance(String),
    /// Caller is not the booking's driver or the listing's owner.
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    /// Malformed input: bad time range, non-positive amount, and the like.
    #[error("validation failed: {0}")]
    Validation(String),
    /// Bookkeeping invariant broken, e.g. a spot release beyond listing
    /// capacity. Never produced by well-behaved callers; indicates a bug.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::InvalidState(a), Self::InvalidState(b)) => a == b,
            (Self::InsufficientCapacity(a), Self::InsufficientCapacity(b)) => a == b,
            (Self::InsufficientBalance(a), Self::InsufficientBalance(b)) => a == b,
            (Self::Unauthorized(a), Self::Unauthorized(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvariantViolation(a), Self::InvariantViolation(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
