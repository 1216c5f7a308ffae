//! Order side and resting order records.
//!
//! An [`OrderRecord`] is an immutable snapshot. Replace and partial trades
//! build a new record with [`OrderRecord::with`]; the old one is handed
//! back to the caller so the ladder can remove it before adding the new
//! one.

use std::fmt;

use crate::types::price::Price;

/// Order identifier. Ids may be reused once the order is gone.
pub type OrderId = i64;

/// Order quantity. Strictly positive while resting.
pub type Quantity = i64;

// ============================================================================
// Side enum
// ============================================================================

/// Order side: Bid or Ask
///
/// Text code used by the compact event format:
/// - Bid = `B`
/// - Ask = `A`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    /// Buy side - highest price is best
    Bid,
    /// Sell side - lowest price is best
    Ask,
}

impl Side {
    /// Both sides, bid first.
    pub const ALL: [Side; 2] = [Side::Bid, Side::Ask];

    /// Single letter code (`B` / `A`)
    pub fn code(self) -> &'static str {
        match self {
            Side::Bid => "B",
            Side::Ask => "A",
        }
    }

    /// Parse a single letter code
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "B" => Some(Side::Bid),
            "A" => Some(Side::Ask),
            _ => None,
        }
    }

    /// Returns the opposite side
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }

    /// True if `a` is a better price than `b` for this side.
    pub fn is_better(self, a: Price, b: Price) -> bool {
        match self {
            Side::Bid => a > b,
            Side::Ask => a < b,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Bid => f.write_str("BID"),
            Side::Ask => f.write_str("ASK"),
        }
    }
}

// ============================================================================
// OrderRecord struct
// ============================================================================

/// Snapshot of one resting order.
///
/// ## Example
///
/// ```
/// use level2_book::types::{OrderRecord, Side};
/// use level2_book::types::price::parse_price;
///
/// let order = OrderRecord::new(Side::Bid, parse_price("1.00").unwrap(), 1000, 10);
/// let replaced = order.with(parse_price("1.05").unwrap(), 600);
///
/// assert_eq!(replaced.side, Side::Bid);
/// assert_eq!(replaced.order_id, 10);
/// assert_eq!(order.quantity, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderRecord {
    /// Bid or Ask, fixed for the life of the order
    pub side: Side,

    /// Resting price
    pub price: Price,

    /// Remaining quantity
    pub quantity: Quantity,

    /// Caller supplied id
    pub order_id: OrderId,
}

impl OrderRecord {
    /// Create a record. Arguments are validated by the engine, not here.
    pub fn new(side: Side, price: Price, quantity: Quantity, order_id: OrderId) -> Self {
        Self {
            side,
            price,
            quantity,
            order_id,
        }
    }

    /// New record with the same side and id.
    #[must_use]
    pub fn with(&self, price: Price, quantity: Quantity) -> Self {
        Self {
            price,
            quantity,
            ..*self
        }
    }

    /// Check the order rests at `price` (value comparison)
    pub fn is_at_price(&self, price: Price) -> bool {
        self.price == price
    }

    /// Check the order is on `side`
    pub fn has_side(&self, side: Side) -> bool {
        self.side == side
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
