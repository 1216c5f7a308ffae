//! Price level: the orders resting at a single price.
//!
//! ## Design
//!
//! A `PriceLevel` holds the set of order ids resident at one price plus a
//! cached total of their quantities, so "size at price" does not have to
//! walk the level.
//!
//! ## Invariant
//!
//! `total_quantity` equals the sum of the live quantities of the ids in
//! the level, and always fits in a `Quantity`. Callers pass the quantity
//! of the record being added or removed; an insert that would push the
//! total past `Quantity::MAX` is refused rather than clamped. The engine
//! checks the cache against the order index in `check_invariants`.

use std::collections::HashSet;

use crate::types::{OrderId, Price, Quantity};

/// Orders resting at a single price.
#[derive(Debug, Clone)]
pub struct PriceLevel {
    /// Price for this level, as first seen
    pub price: Price,

    /// Ids resting at this price
    orders: HashSet<OrderId>,

    /// Cached sum of the quantities of `orders`
    total_quantity: Quantity,
}

impl PriceLevel {
    /// Create a new empty price level
    pub fn new(price: Price) -> Self {
        Self {
            price,
            orders: HashSet::new(),
            total_quantity: 0,
        }
    }

    /// Check if the price level is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Number of orders at this price level
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Aggregated resting quantity at this price
    #[inline]
    pub fn total_quantity(&self) -> Quantity {
        self.total_quantity
    }

    /// Check if `order_id` rests here
    #[inline]
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.orders.contains(&order_id)
    }

    /// Ids resting at this price (unordered)
    pub fn order_ids(&self) -> impl Iterator<Item = OrderId> + '_ {
        self.orders.iter().copied()
    }

    /// Add an order to the level
    ///
    /// # Returns
    ///
    /// `false` (and no change) if the id is already here or the total
    /// would overflow
    pub fn insert(&mut self, order_id: OrderId, quantity: Quantity) -> bool {
        let Some(total) = self.total_quantity.checked_add(quantity) else {
            return false;
        };
        if !self.orders.insert(order_id) {
            return false;
        }
        self.total_quantity = total;
        true
    }

    /// Remove an order from the level
    ///
    /// # Returns
    ///
    /// `false` (and no change) if the id is not here or `quantity` exceeds
    /// the level total
    pub fn remove(&mut self, order_id: OrderId, quantity: Quantity) -> bool {
        if quantity > self.total_quantity || !self.orders.remove(&order_id) {
            return false;
        }
        self.total_quantity -= quantity;
        true
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
