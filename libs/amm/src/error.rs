//! Pricing errors for the AMM engine
//!
//! Every variant means "this input cannot be priced". None of them are
//! transient, so callers block submission instead of retrying.

use thiserror::Error;

/// Reasons a swap or liquidity quote could not be produced
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Non-positive amount, non-finite number, malformed percentage or an
    /// intermediate value that does not fit the integer domain
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The trade would take the whole reserve (or more)
    #[error("Pool exhausted: trade needs {requested} but only {available} is available")]
    PoolExhausted { requested: u128, available: u128 },

    /// A reserve is zero or the pool otherwise has no defined price
    #[error("Degenerate pool state: {reason}")]
    DegenerateState { reason: String },
}

impl PricingError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn pool_exhausted(requested: u128, available: u128) -> Self {
        Self::PoolExhausted {
            requested,
            available,
        }
    }

    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateState {
            reason: reason.into(),
        }
    }

    /// Arithmetic overflow while evaluating `operation`
    pub fn overflow(operation: &str) -> Self {
        Self::InvalidInput {
            reason: format!("{operation} is not representable as a u128 amount"),
        }
    }

    /// Pricing failures never clear up on their own; a fresh snapshot or a
    /// different input is needed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

/// Result type for pricing operations
pub type PricingResult<T> = std::result::Result<T, PricingError>;
