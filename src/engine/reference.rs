//! Scan-based reference engine.
//!
//! One map from id to order and nothing else. Mutations are O(1), every
//! query walks all resting orders. Used as the oracle in differential
//! tests; not meant for the hot path.

use std::collections::{BTreeSet, HashMap};

use crate::engine::{Applied, Level2View};
use crate::error::{BookError, Result};
use crate::types::price::{
    validate_level_total, validate_price, validate_quantity, validate_trade,
};
use crate::types::{OrderId, OrderRecord, Price, Quantity, Side};

/// Level 2 view answered by full scans.
#[derive(Debug, Default, Clone)]
pub struct ReferenceEngine {
    orders: HashMap<OrderId, OrderRecord>,
}

impl ReferenceEngine {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Total resting orders, both sides
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Current record for a resting order
    pub fn order(&self, order_id: OrderId) -> Option<&OrderRecord> {
        self.orders.get(&order_id)
    }

    fn side_orders(&self, side: Side) -> impl Iterator<Item = &OrderRecord> + '_ {
        self.orders.values().filter(move |o| o.has_side(side))
    }

    /// Sum at `side`/`price` over every order except `skip`.
    fn level_total(&self, side: Side, price: Price, skip: Option<OrderId>) -> Quantity {
        self.side_orders(side)
            .filter(|o| o.is_at_price(price) && Some(o.order_id) != skip)
            .map(|o| o.quantity)
            .sum()
    }
}

impl Level2View for ReferenceEngine {
    fn on_new_order(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<Applied> {
        validate_price(price)?;
        validate_quantity(quantity)?;
        if self.orders.contains_key(&order_id) {
            return Err(BookError::DuplicateId(order_id));
        }
        validate_level_total(price, self.level_total(side, price, None), quantity)?;

        let record = OrderRecord::new(side, price, quantity, order_id);
        self.orders.insert(order_id, record);
        Ok(Applied::Added(record))
    }

    fn on_cancel_order(&mut self, order_id: OrderId) -> Result<Applied> {
        self.orders
            .remove(&order_id)
            .map(Applied::Cancelled)
            .ok_or(BookError::MissingId(order_id))
    }

    fn on_replace_order(
        &mut self,
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<Applied> {
        let previous = *self
            .orders
            .get(&order_id)
            .ok_or(BookError::MissingId(order_id))?;
        validate_price(price)?;
        validate_quantity(quantity)?;
        let resting = self.level_total(previous.side, price, Some(order_id));
        validate_level_total(price, resting, quantity)?;

        let current = previous.with(price, quantity);
        self.orders.insert(order_id, current);
        Ok(Applied::Replaced { previous, current })
    }

    fn on_trade(&mut self, quantity: Quantity, resting_order_id: OrderId) -> Result<Applied> {
        let previous = *self
            .orders
            .get(&resting_order_id)
            .ok_or(BookError::MissingId(resting_order_id))?;
        let left = validate_trade(quantity, previous.quantity)?;

        let remaining = if left > 0 {
            let current = previous.with(previous.price, left);
            self.orders.insert(resting_order_id, current);
            Some(current)
        } else {
            self.orders.remove(&resting_order_id);
            None
        };
        Ok(Applied::Filled { previous, remaining })
    }

    fn size_for_price_level(&self, side: Side, price: Price) -> Quantity {
        self.level_total(side, price, None)
    }

    fn book_depth(&self, side: Side) -> usize {
        // BTreeSet compares by value, so 2.00 and 2.000 collapse
        self.side_orders(side)
            .map(|o| o.price)
            .collect::<BTreeSet<_>>()
            .len()
    }

    fn top_of_book(&self, side: Side) -> Option<Price> {
        self.side_orders(side)
            .map(|o| o.price)
            .reduce(|best, price| if side.is_better(price, best) { price } else { best })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
