//! Error types for the Level 2 book.
//!
//! Every failure a caller can observe is a typed [`BookError`]. The engine
//! validates before it mutates, so a rejection (see
//! [`BookError::is_rejection`]) leaves the book exactly as it was before
//! the call. `Inconsistent` is different: with invariant verification on,
//! it is reported after the event has already been applied.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{OrderId, Quantity};

/// Result type alias for book operations.
pub type Result<T> = std::result::Result<T, BookError>;

/// Main error type for book operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookError {
    /// A new order reuses the id of an order that is still resting
    #[error("Order with id {0} already exists")]
    DuplicateId(OrderId),

    /// Cancel/replace/trade referenced an id that is not resting
    #[error("No order with id {0} exists")]
    MissingId(OrderId),

    /// Argument rejected before any state was touched
    #[error(transparent)]
    InvalidArgument(#[from] InvalidArgument),

    /// Index and ladder disagree. Never expected while the engine
    /// upholds its invariants.
    #[error("Book inconsistency: {0}")]
    Inconsistent(String),

    /// Compact event text could not be parsed
    #[error("Can't parse {input:?}: {reason}")]
    Parse {
        /// The offending input
        input: String,
        /// What was wrong with it
        reason: String,
    },
}

impl BookError {
    /// Create an inconsistency error from any string-like type.
    pub fn inconsistent(msg: impl Into<String>) -> Self {
        BookError::Inconsistent(msg.into())
    }

    /// Create a parse error for `input`.
    pub fn parse(input: impl Into<String>, reason: impl Into<String>) -> Self {
        BookError::Parse {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// True for the errors a caller can cause with bad input
    /// (as opposed to a broken book).
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            BookError::DuplicateId(_) | BookError::MissingId(_) | BookError::InvalidArgument(_)
        )
    }
}

/// Reasons an event argument is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidArgument {
    #[error("Price must be greater or equal to 0, was:{0}")]
    NegativePrice(Decimal),

    #[error("Quantity must be greater than 0, was:{0}")]
    NonPositiveQuantity(Quantity),

    #[error("Trade quantity must be greater or equal to 0, was:{0}")]
    NegativeTradeQuantity(Quantity),

    #[error("Can't trade more than quantity:{traded}>{resting}")]
    TradeExceedsResting {
        traded: Quantity,
        resting: Quantity,
    },

    /// Level total would not fit in a `Quantity`
    #[error("Size at level {price} would overflow:{resting}+{added}")]
    LevelOverflow {
        price: Decimal,
        resting: Quantity,
        added: Quantity,
    },
}
