//! Level 2 engines.
//!
//! ## Engines
//!
//! - [`OrderBookEngine`]: id index plus one sorted ladder per side.
//!   O(1) id lookup, O(log n) updates and queries.
//! - [`ReferenceEngine`]: a single id -> order map, every query a full
//!   scan. Too slow for production; simple enough to be obviously right,
//!   which makes it the oracle the scalable engine is checked against.
//!
//! Both implement [`Level2View`] and share one error contract.
//!
//! ## Event Rules
//!
//! | Event | Needs | Effect |
//! |-------|-------|--------|
//! | new | price >= 0, qty > 0, id absent, level has room | order rests |
//! | cancel | id resting | order removed |
//! | replace | id resting, price >= 0, qty > 0, level has room | new price/qty, same side |
//! | trade | id resting, 0 <= qty <= resting | reduce, or remove on full fill |
//!
//! A rejected event leaves the book untouched. "Room" means the level's
//! total stays within `Quantity::MAX`.
//!
//! ## Example
//!
//! ```
//! use level2_book::engine::{Level2View, OrderBookEngine};
//! use level2_book::types::{price::parse_price, Side};
//!
//! let mut book = OrderBookEngine::new();
//! book.on_new_order(Side::Bid, parse_price("1.00").unwrap(), 1000, 10).unwrap();
//! book.on_new_order(Side::Bid, parse_price("1.05").unwrap(), 2000, 12).unwrap();
//! assert_eq!(book.top_of_book(Side::Bid), parse_price("1.05"));
//!
//! book.on_trade(600, 10).unwrap();
//! assert_eq!(book.size_for_price_level(Side::Bid, parse_price("1.00").unwrap()), 400);
//!
//! book.on_trade(400, 10).unwrap();
//! assert_eq!(book.book_depth(Side::Bid), 1);
//! ```

pub mod book;
pub mod reference;

pub use book::OrderBookEngine;
pub use reference::ReferenceEngine;

use crate::error::Result;
use crate::types::{BookEvent, OrderId, OrderRecord, Price, Quantity, Side};

/// What a successful event did to the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// New order now resting
    Added(OrderRecord),

    /// Order removed by cancel
    Cancelled(OrderRecord),

    /// Order re-priced and/or re-sized
    Replaced {
        previous: OrderRecord,
        current: OrderRecord,
    },

    /// Trade against a resting order. `remaining` is `None` on a full fill.
    Filled {
        previous: OrderRecord,
        remaining: Option<OrderRecord>,
    },
}

impl Applied {
    /// True if the event took the order off the book
    pub fn removed_order(&self) -> bool {
        matches!(
            self,
            Applied::Cancelled(_) | Applied::Filled { remaining: None, .. }
        )
    }
}

/// Event and query surface of a Level 2 view for one instrument.
pub trait Level2View {
    /// Rest a new order.
    fn on_new_order(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<Applied>;

    /// Remove a resting order.
    fn on_cancel_order(&mut self, order_id: OrderId) -> Result<Applied>;

    /// Change price and quantity of a resting order. Side never changes.
    fn on_replace_order(
        &mut self,
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<Applied>;

    /// Apply an externally matched trade to a resting order.
    fn on_trade(&mut self, quantity: Quantity, resting_order_id: OrderId) -> Result<Applied>;

    /// Aggregated resting quantity at `price` on `side`, 0 if none.
    fn size_for_price_level(&self, side: Side, price: Price) -> Quantity;

    /// Number of distinct non-empty price levels on `side`.
    fn book_depth(&self, side: Side) -> usize;

    /// Best price on `side`, `None` if the side is empty.
    fn top_of_book(&self, side: Side) -> Option<Price>;

    /// Dispatch a typed event to the matching handler.
    fn apply(&mut self, event: &BookEvent) -> Result<Applied> {
        match *event {
            BookEvent::New {
                side,
                price,
                quantity,
                order_id,
            } => self.on_new_order(side, price, quantity, order_id),
            BookEvent::Cancel { order_id } => self.on_cancel_order(order_id),
            BookEvent::Replace {
                price,
                quantity,
                order_id,
            } => self.on_replace_order(price, quantity, order_id),
            BookEvent::Trade { quantity, order_id } => self.on_trade(quantity, order_id),
        }
    }
}
