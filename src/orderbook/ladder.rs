//! Per-side sorted price ladder.
//!
//! ## Price Ordering
//!
//! The ordering is chosen once, by type, when the ladder is built:
//!
//! - **Bids** ([`BidPriority`]): keyed by `Reverse(price)`, high-to-low
//! - **Asks** ([`AskPriority`]): keyed by `price`, low-to-high
//!
//! Either way the best price is the first key, so queries never branch on
//! side.
//!
//! ## Performance
//!
//! | Operation | Complexity |
//! |-----------|------------|
//! | `add` / `remove` | O(log n) |
//! | `top_of_book` | O(log n) |
//! | `depth` | O(1) |
//! | `size_at` | O(log n) |
//!
//! n is the number of distinct price levels on the side.

use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::marker::PhantomData;

use tracing::trace;

use crate::error::{BookError, Result};
use crate::orderbook::PriceLevel;
use crate::types::{OrderId, Price, Quantity, Side};

/// Ordering of one side of the book.
pub trait LadderPriority: Debug {
    /// Map key whose natural order puts the best price first
    type Key: Ord + Copy + Debug;

    /// Side this ordering belongs to
    const SIDE: Side;

    /// Build the map key for `price`
    fn key(price: Price) -> Self::Key;
}

/// Highest price first
#[derive(Debug, Clone, Copy, Default)]
pub struct BidPriority;

impl LadderPriority for BidPriority {
    type Key = Reverse<Price>;
    const SIDE: Side = Side::Bid;

    #[inline]
    fn key(price: Price) -> Self::Key {
        Reverse(price)
    }
}

/// Lowest price first
#[derive(Debug, Clone, Copy, Default)]
pub struct AskPriority;

impl LadderPriority for AskPriority {
    type Key = Price;
    const SIDE: Side = Side::Ask;

    #[inline]
    fn key(price: Price) -> Self::Key {
        price
    }
}

/// Bid side ladder
pub type BidLadder = PriceLadder<BidPriority>;

/// Ask side ladder
pub type AskLadder = PriceLadder<AskPriority>;

/// Sorted mapping from price to the orders resting there.
///
/// A price key exists only while at least one order rests at it; removing
/// the last order deletes the level, so `depth` counts non-empty levels.
#[derive(Debug)]
pub struct PriceLadder<P: LadderPriority> {
    /// Levels, best first
    levels: BTreeMap<P::Key, PriceLevel>,

    /// Total orders across all levels
    order_count: usize,

    _priority: PhantomData<P>,
}

impl<P: LadderPriority> Default for PriceLadder<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: LadderPriority> PriceLadder<P> {
    /// Create an empty ladder
    pub fn new() -> Self {
        Self {
            levels: BTreeMap::new(),
            order_count: 0,
            _priority: PhantomData,
        }
    }

    /// Side this ladder serves
    #[inline]
    pub fn side(&self) -> Side {
        P::SIDE
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Add `order_id` with `quantity` at `price`, creating the level if needed.
    ///
    /// # Errors
    ///
    /// `Inconsistent` if the id already rests at that price or the level
    /// total would overflow. The engine checks room before calling.
    pub fn add(&mut self, order_id: OrderId, price: Price, quantity: Quantity) -> Result<()> {
        let level = self.levels.entry(P::key(price)).or_insert_with(|| {
            trace!(side = %P::SIDE, %price, "open level");
            PriceLevel::new(price)
        });

        if !level.insert(order_id, quantity) {
            let reason = if level.contains(order_id) {
                format!("order {order_id} already on {} level {price}", P::SIDE)
            } else {
                format!("{} level {price} total overflows adding {quantity}", P::SIDE)
            };
            return Err(BookError::inconsistent(reason));
        }
        self.order_count += 1;
        Ok(())
    }

    /// Remove `order_id` with `quantity` from `price`.
    ///
    /// Deletes the level when its last order leaves.
    ///
    /// # Errors
    ///
    /// `Inconsistent` if the level is absent, the id is not in it, or
    /// `quantity` exceeds the level total.
    pub fn remove(&mut self, order_id: OrderId, price: Price, quantity: Quantity) -> Result<()> {
        let key = P::key(price);
        let level = self.levels.get_mut(&key).ok_or_else(|| {
            BookError::inconsistent(format!("no {} level at {price}", P::SIDE))
        })?;

        if !level.remove(order_id, quantity) {
            return Err(BookError::inconsistent(format!(
                "order {order_id} not on {} level {price}",
                P::SIDE
            )));
        }
        self.order_count -= 1;

        if level.is_empty() {
            trace!(side = %P::SIDE, %price, "close level");
            self.levels.remove(&key);
        }
        Ok(())
    }

    /// Drop every level
    pub fn clear(&mut self) {
        self.levels.clear();
        self.order_count = 0;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Best price on this side, or `None` if the side is empty
    #[inline]
    pub fn top_of_book(&self) -> Option<Price> {
        self.levels.values().next().map(|level| level.price)
    }

    /// Number of distinct non-empty price levels
    #[inline]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Aggregated quantity at `price`; 0 if no level there
    pub fn size_at(&self, price: Price) -> Quantity {
        self.level(price).map_or(0, PriceLevel::total_quantity)
    }

    /// Number of orders at `price`
    pub fn order_count_at(&self, price: Price) -> usize {
        self.level(price).map_or(0, PriceLevel::order_count)
    }

    /// Check if `order_id` rests at `price` on this side
    pub fn contains(&self, order_id: OrderId, price: Price) -> bool {
        self.level(price).is_some_and(|level| level.contains(order_id))
    }

    /// Level at `price`
    #[inline]
    pub fn level(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&P::key(price))
    }

    /// Levels, best first
    pub fn levels(&self) -> impl Iterator<Item = &PriceLevel> + '_ {
        self.levels.values()
    }

    /// Total orders on this side
    #[inline]
    pub fn order_count(&self) -> usize {
        self.order_count
    }

    /// Check if no order rests on this side
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
