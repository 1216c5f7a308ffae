//! Scalable Level 2 engine.
//!
//! ## Architecture
//!
//! - **OrderIndex**: id -> current record, O(1)
//! - **BidLadder / AskLadder**: price -> ids, best first, O(log n)
//!
//! Every resting id is in the index and in exactly one level of its own
//! side's ladder, at the record's price. All mutations check their
//! arguments (and look the id up) before touching either structure.

use tracing::{debug, warn};

use crate::config::BookConfig;
use crate::engine::{Applied, Level2View};
use crate::error::{BookError, Result};
use crate::orderbook::{AskLadder, BidLadder, LadderPriority, OrderIndex, PriceLadder};
use crate::types::price::{
    validate_level_total, validate_price, validate_quantity, validate_trade,
};
use crate::types::{OrderId, OrderRecord, Price, Quantity, Side};

/// Level 2 view backed by an id index and two price ladders.
#[derive(Debug)]
pub struct OrderBookEngine {
    /// Resting orders by id
    index: OrderIndex,

    /// Bid levels (high to low)
    bids: BidLadder,

    /// Ask levels (low to high)
    asks: AskLadder,

    config: BookConfig,
}

impl Default for OrderBookEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderBookEngine {
    /// Create an empty book with the default configuration
    pub fn new() -> Self {
        Self::with_config(BookConfig::default())
    }

    /// Create an empty book with room for `order_capacity` resting orders
    ///
    /// # Example
    ///
    /// ```
    /// use level2_book::engine::OrderBookEngine;
    ///
    /// let book = OrderBookEngine::with_capacity(100_000);
    /// assert!(book.capacity() >= 100_000);
    /// ```
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self::with_config(BookConfig::default().with_order_capacity(order_capacity))
    }

    /// Create an empty book from a configuration
    pub fn with_config(config: BookConfig) -> Self {
        Self {
            index: OrderIndex::with_capacity(config.order_capacity),
            bids: BidLadder::new(),
            asks: AskLadder::new(),
            config,
        }
    }

    /// Active configuration
    #[inline]
    pub fn config(&self) -> &BookConfig {
        &self.config
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    /// Pre-allocated order slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }

    /// Total resting orders, both sides
    #[inline]
    pub fn order_count(&self) -> usize {
        self.index.len()
    }

    /// Check if nothing rests on either side
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Current record for a resting order
    #[inline]
    pub fn order(&self, order_id: OrderId) -> Option<&OrderRecord> {
        self.index.get(order_id)
    }

    /// Check if an order is resting
    #[inline]
    pub fn contains_order(&self, order_id: OrderId) -> bool {
        self.index.contains(order_id)
    }

    /// Bid ladder (read only)
    #[inline]
    pub fn bids(&self) -> &BidLadder {
        &self.bids
    }

    /// Ask ladder (read only)
    #[inline]
    pub fn asks(&self) -> &AskLadder {
        &self.asks
    }

    /// Best ask minus best bid, `None` unless both sides have orders.
    ///
    /// Negative when the book is crossed; the engine does not match.
    pub fn spread(&self) -> Option<Price> {
        match (self.bids.top_of_book(), self.asks.top_of_book()) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// Drop every order on both sides
    pub fn clear(&mut self) {
        self.index.clear();
        self.bids.clear();
        self.asks.clear();
    }

    // ========================================================================
    // Consistency
    // ========================================================================

    /// Verify the index and both ladders agree.
    ///
    /// Checks that every indexed order sits in its side's ladder at its
    /// price, that every ladder id is indexed with that side and price,
    /// that no level is empty, and that each cached level total equals the
    /// sum of its orders' quantities.
    ///
    /// # Errors
    ///
    /// `Inconsistent` describing the first violation found.
    pub fn check_invariants(&self) -> Result<()> {
        check_ladder(&self.bids, &self.index)?;
        check_ladder(&self.asks, &self.index)?;

        for record in self.index.iter() {
            let on_ladder = match record.side {
                Side::Bid => self.bids.contains(record.order_id, record.price),
                Side::Ask => self.asks.contains(record.order_id, record.price),
            };
            if !on_ladder {
                return Err(BookError::inconsistent(format!(
                    "order {} indexed at {} {} but not on the ladder",
                    record.order_id, record.side, record.price
                )));
            }
        }

        let laddered = self.bids.order_count() + self.asks.order_count();
        if laddered != self.index.len() {
            return Err(BookError::inconsistent(format!(
                "{} orders on ladders, {} indexed",
                laddered,
                self.index.len()
            )));
        }
        Ok(())
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    fn ladder_add(&mut self, record: &OrderRecord) -> Result<()> {
        match record.side {
            Side::Bid => self.bids.add(record.order_id, record.price, record.quantity),
            Side::Ask => self.asks.add(record.order_id, record.price, record.quantity),
        }
    }

    fn ladder_remove(&mut self, record: &OrderRecord) -> Result<()> {
        match record.side {
            Side::Bid => self.bids.remove(record.order_id, record.price, record.quantity),
            Side::Ask => self.asks.remove(record.order_id, record.price, record.quantity),
        }
    }

    /// Swap `previous` for `current` in the index and the ladder.
    /// Arguments must already be validated.
    fn swap_record(&mut self, previous: &OrderRecord, current: OrderRecord) -> Result<()> {
        self.index.replace(current.order_id, current)?;
        self.ladder_remove(previous)?;
        self.ladder_add(&current)
    }

    /// Take a resting order off the book.
    fn remove_record(&mut self, order_id: OrderId) -> Result<OrderRecord> {
        let previous = self.index.remove(order_id)?;
        self.ladder_remove(&previous)?;
        Ok(previous)
    }

    fn after_mutation(&self) -> Result<()> {
        if !self.config.verify_invariants {
            return Ok(());
        }
        self.check_invariants().map_err(|err| {
            warn!(error = %err, "book invariants violated");
            err
        })
    }

    /// Reject `quantity` if the `side` level at `price` cannot hold it.
    /// `leaving` is what the same order takes off that level first.
    fn check_level_room(
        &self,
        side: Side,
        price: Price,
        quantity: Quantity,
        leaving: Quantity,
    ) -> Result<()> {
        let resting = self.size_for_price_level(side, price) - leaving;
        validate_level_total(price, resting, quantity)?;
        Ok(())
    }

    fn resting(&self, order_id: OrderId) -> Result<OrderRecord> {
        self.index
            .get(order_id)
            .copied()
            .ok_or(BookError::MissingId(order_id))
    }
}

impl Level2View for OrderBookEngine {
    fn on_new_order(
        &mut self,
        side: Side,
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<Applied> {
        validate_price(price)?;
        validate_quantity(quantity)?;
        if self.index.contains(order_id) {
            return Err(BookError::DuplicateId(order_id));
        }
        self.check_level_room(side, price, quantity, 0)?;

        let record = OrderRecord::new(side, price, quantity, order_id);
        self.index.insert(order_id, record)?;
        self.ladder_add(&record)?;
        self.after_mutation()?;

        debug!(order_id, %side, %price, quantity, "new order");
        Ok(Applied::Added(record))
    }

    fn on_cancel_order(&mut self, order_id: OrderId) -> Result<Applied> {
        let previous = self.remove_record(order_id)?;
        self.after_mutation()?;

        debug!(order_id, side = %previous.side, price = %previous.price, "cancel");
        Ok(Applied::Cancelled(previous))
    }

    fn on_replace_order(
        &mut self,
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    ) -> Result<Applied> {
        let previous = self.resting(order_id)?;
        validate_price(price)?;
        validate_quantity(quantity)?;
        let leaving = if previous.price == price { previous.quantity } else { 0 };
        self.check_level_room(previous.side, price, quantity, leaving)?;

        let current = previous.with(price, quantity);
        self.swap_record(&previous, current)?;
        self.after_mutation()?;

        debug!(
            order_id,
            from_price = %previous.price,
            from_quantity = previous.quantity,
            %price,
            quantity,
            "replace"
        );
        Ok(Applied::Replaced { previous, current })
    }

    fn on_trade(&mut self, quantity: Quantity, resting_order_id: OrderId) -> Result<Applied> {
        let previous = self.resting(resting_order_id)?;
        let left = validate_trade(quantity, previous.quantity)?;

        let remaining = if left > 0 {
            let current = previous.with(previous.price, left);
            self.swap_record(&previous, current)?;
            Some(current)
        } else {
            self.remove_record(resting_order_id)?;
            None
        };
        self.after_mutation()?;

        debug!(order_id = resting_order_id, traded = quantity, left, "trade");
        Ok(Applied::Filled { previous, remaining })
    }

    fn size_for_price_level(&self, side: Side, price: Price) -> Quantity {
        match side {
            Side::Bid => self.bids.size_at(price),
            Side::Ask => self.asks.size_at(price),
        }
    }

    fn book_depth(&self, side: Side) -> usize {
        match side {
            Side::Bid => self.bids.depth(),
            Side::Ask => self.asks.depth(),
        }
    }

    fn top_of_book(&self, side: Side) -> Option<Price> {
        match side {
            Side::Bid => self.bids.top_of_book(),
            Side::Ask => self.asks.top_of_book(),
        }
    }
}

/// Check one ladder against the index.
fn check_ladder<P: LadderPriority>(ladder: &PriceLadder<P>, index: &OrderIndex) -> Result<()> {
    let side = ladder.side();
    let mut orders = 0;

    for level in ladder.levels() {
        if level.is_empty() {
            return Err(BookError::inconsistent(format!(
                "empty {side} level at {}",
                level.price
            )));
        }

        // Widened so a corrupt cache cannot overflow the recount
        let mut total: i128 = 0;
        for order_id in level.order_ids() {
            let record = index.get(order_id).ok_or_else(|| {
                BookError::inconsistent(format!(
                    "order {order_id} on {side} level {} is not indexed",
                    level.price
                ))
            })?;
            if record.side != side || record.price != level.price {
                return Err(BookError::inconsistent(format!(
                    "order {order_id} on {side} level {} but indexed at {} {}",
                    level.price, record.side, record.price
                )));
            }
            total += i128::from(record.quantity);
        }

        if total != i128::from(level.total_quantity()) {
            return Err(BookError::inconsistent(format!(
                "{side} level {} caches {} but orders sum to {total}",
                level.price,
                level.total_quantity()
            )));
        }
        orders += level.order_count();
    }

    if orders != ladder.order_count() {
        return Err(BookError::inconsistent(format!(
            "{side} ladder counts {} orders, levels hold {orders}",
            ladder.order_count()
        )));
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidArgument;
    use crate::types::price::parse_price;

    fn px(s: &str) -> Price {
        parse_price(s).unwrap()
    }

    fn checked_book() -> OrderBookEngine {
        OrderBookEngine::with_config(BookConfig::default().with_verify_invariants(true))
    }

    /// Snapshot of every query the view answers for the given prices.
    fn snapshot(book: &OrderBookEngine, prices: &[&str]) -> Vec<(Option<Price>, usize, Vec<Quantity>)> {
        Side::ALL
            .iter()
            .map(|&side| {
                (
                    book.top_of_book(side),
                    book.book_depth(side),
                    prices
                        .iter()
                        .map(|p| book.size_for_price_level(side, px(p)))
                        .collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_book_new() {
        let book = OrderBookEngine::new();

        assert!(book.is_empty());
        assert_eq!(book.order_count(), 0);
        for side in Side::ALL {
            assert_eq!(book.book_depth(side), 0);
            assert!(book.top_of_book(side).is_none());
            assert_eq!(book.size_for_price_level(side, Price::TEN), 0);
        }
        assert!(book.spread().is_none());
        assert!(book.check_invariants().is_ok());
    }

    #[test]
    fn test_book_with_capacity() {
        let book = OrderBookEngine::with_capacity(10_000);
        assert!(book.capacity() >= 10_000);
        assert_eq!(book.config().order_capacity, 10_000);
    }

    #[test]
    fn test_new_order() {
        let mut book = checked_book();

        let applied = book.on_new_order(Side::Bid, px("1.00"), 1000, 10).unwrap();
        assert_eq!(applied, Applied::Added(OrderRecord::new(Side::Bid, px("1"), 1000, 10)));

        assert_eq!(book.book_depth(Side::Bid), 1);
        assert_eq!(book.top_of_book(Side::Bid), Some(px("1.00")));
        assert_eq!(book.order(10).unwrap().quantity, 1000);
        assert!(book.contains_order(10));
    }

    #[test]
    fn test_new_order_duplicate_either_side() {
        let mut book = checked_book();
        book.on_new_order(Side::Bid, px("1.00"), 1000, 10).unwrap();

        let before = snapshot(&book, &["1.00"]);
        assert_eq!(
            book.on_new_order(Side::Bid, px("1.00"), 1000, 10).unwrap_err(),
            BookError::DuplicateId(10)
        );
        assert_eq!(
            book.on_new_order(Side::Ask, px("1.00"), 1000, 10).unwrap_err(),
            BookError::DuplicateId(10)
        );
        assert_eq!(snapshot(&book, &["1.00"]), before);
    }

    #[test]
    fn test_new_order_invalid_arguments() {
        let mut book = checked_book();

        let err = book.on_new_order(Side::Ask, px("-1.00"), 1000, 14).unwrap_err();
        assert_eq!(err.to_string(), "Price must be greater or equal to 0, was:-1.00");

        let err = book.on_new_order(Side::Ask, px("1.00"), -1000, 14).unwrap_err();
        assert_eq!(err.to_string(), "Quantity must be greater than 0, was:-1000");

        let err = book.on_new_order(Side::Ask, px("1.00"), 0, 14).unwrap_err();
        assert_eq!(
            err,
            BookError::InvalidArgument(InvalidArgument::NonPositiveQuantity(0))
        );

        assert!(book.is_empty());
        assert!(!book.contains_order(14));
    }

    #[test]
    fn test_cancel_order() {
        let mut book = checked_book();
        book.on_new_order(Side::Ask, px("1.00"), 1000, 10).unwrap();
        book.on_new_order(Side::Ask, px("1.05"), 2000, 12).unwrap();

        let applied = book.on_cancel_order(10).unwrap();
        assert!(applied.removed_order());

        assert_eq!(book.book_depth(Side::Ask), 1);
        assert_eq!(book.top_of_book(Side::Ask), Some(px("1.05")));
        assert_eq!(book.on_cancel_order(10).unwrap_err(), BookError::MissingId(10));

        // Id can be reused once gone
        book.on_new_order(Side::Ask, px("1.00"), 2000, 10).unwrap();
        assert_eq!(book.book_depth(Side::Ask), 2);
    }

    #[test]
    fn test_replace_quantity_same_level() {
        let mut book = checked_book();
        book.on_new_order(Side::Bid, px("1.00"), 1000, 10).unwrap();
        book.on_new_order(Side::Bid, px("1.00"), 2000, 12).unwrap();

        book.on_replace_order(px("1.00"), 600, 12).unwrap();
        assert_eq!(book.size_for_price_level(Side::Bid, Price::ONE), 1600);
        assert_eq!(book.book_depth(Side::Bid), 1);
    }

    #[test]
    fn test_replace_moves_level() {
        let mut book = checked_book();
        book.on_new_order(Side::Ask, px("1.00"), 1000, 10).unwrap();
        book.on_new_order(Side::Ask, px("1.00"), 600, 12).unwrap();

        let applied = book.on_replace_order(px("2.00"), 600, 12).unwrap();
        match applied {
            Applied::Replaced { previous, current } => {
                assert_eq!(previous.price, px("1"));
                assert_eq!(current.price, px("2"));
                assert_eq!(current.side, Side::Ask);
            }
            other => panic!("unexpected {other:?}"),
        }

        assert_eq!(book.size_for_price_level(Side::Ask, px("1")), 1000);
        assert_eq!(book.size_for_price_level(Side::Ask, px("2")), 600);
        assert_eq!(book.book_depth(Side::Ask), 2);
    }

    #[test]
    fn test_replace_rejections_leave_state() {
        let mut book = checked_book();
        book.on_new_order(Side::Bid, px("1.00"), 1000, 10).unwrap();
        book.on_new_order(Side::Bid, px("1.00"), 600, 12).unwrap();
        let before = snapshot(&book, &["1.00", "2.00"]);

        // No implicit delete through a zero quantity
        assert!(book.on_replace_order(px("1.00"), 0, 12).is_err());
        assert!(book.on_replace_order(px("-2.00"), 10, 12).is_err());
        assert_eq!(book.on_replace_order(px("1.00"), 0, 42).unwrap_err(), BookError::MissingId(42));

        assert_eq!(snapshot(&book, &["1.00", "2.00"]), before);
        assert_eq!(book.order(12).unwrap().quantity, 600);
        assert!(book.check_invariants().is_ok());
    }

    #[test]
    fn test_trade_partial_then_full() {
        let mut book = checked_book();
        book.on_new_order(Side::Bid, px("1.00"), 1000, 10).unwrap();
        book.on_new_order(Side::Bid, px("1.05"), 2000, 12).unwrap();

        let applied = book.on_trade(600, 10).unwrap();
        assert!(!applied.removed_order());
        assert_eq!(book.size_for_price_level(Side::Bid, px("1.00")), 400);
        assert_eq!(book.order(10).unwrap().price, px("1.00"));

        let applied = book.on_trade(400, 10).unwrap();
        assert!(applied.removed_order());
        assert_eq!(book.book_depth(Side::Bid), 1);
        assert_eq!(book.top_of_book(Side::Bid), Some(px("1.05")));
        assert_eq!(book.on_trade(1, 10).unwrap_err(), BookError::MissingId(10));
    }

    #[test]
    fn test_trade_zero_is_noop() {
        let mut book = checked_book();
        book.on_new_order(Side::Ask, px("3.00"), 500, 1).unwrap();

        book.on_trade(0, 1).unwrap();
        assert_eq!(book.size_for_price_level(Side::Ask, px("3")), 500);
    }

    #[test]
    fn test_trade_rejections() {
        let mut book = checked_book();
        book.on_new_order(Side::Ask, px("1.00"), 1000, 10).unwrap();
        let before = snapshot(&book, &["1.00"]);

        assert_eq!(
            book.on_trade(1001, 10).unwrap_err(),
            BookError::InvalidArgument(InvalidArgument::TradeExceedsResting {
                traded: 1001,
                resting: 1000,
            })
        );
        assert_eq!(
            book.on_trade(-1, 10).unwrap_err(),
            BookError::InvalidArgument(InvalidArgument::NegativeTradeQuantity(-1))
        );
        assert_eq!(snapshot(&book, &["1.00"]), before);
    }

    #[test]
    fn test_side_independence() {
        let mut book = checked_book();
        book.on_new_order(Side::Ask, px("2.00"), 7000, 11).unwrap();
        book.on_new_order(Side::Bid, px("2.00"), 5000, 14).unwrap();

        assert_eq!(book.size_for_price_level(Side::Ask, px("2.000")), 7000);
        assert_eq!(book.size_for_price_level(Side::Bid, px("2.000")), 5000);

        book.on_cancel_order(14).unwrap();
        assert_eq!(book.size_for_price_level(Side::Ask, px("2")), 7000);
        assert_eq!(book.book_depth(Side::Bid), 0);
    }

    #[test]
    fn test_spread() {
        let mut book = OrderBookEngine::new();
        book.on_new_order(Side::Bid, px("1.05"), 100, 1).unwrap();
        assert!(book.spread().is_none());

        book.on_new_order(Side::Ask, px("1.10"), 100, 2).unwrap();
        assert_eq!(book.spread(), Some(px("0.05")));
    }

    #[test]
    fn test_apply_events() {
        let mut book = checked_book();
        for line in ["N#B:1.00:1000:10", "N#B:1.05:2000:12", "T#600:10", "R#1.10:2000:12", "C#10"] {
            book.apply(&line.parse().unwrap()).unwrap();
        }

        assert_eq!(book.book_depth(Side::Bid), 1);
        assert_eq!(book.top_of_book(Side::Bid), Some(px("1.1")));
        assert_eq!(book.order_count(), 1);
    }

    #[test]
    fn test_check_invariants_detects_corruption() {
        let mut book = OrderBookEngine::new();
        book.on_new_order(Side::Bid, px("1.00"), 1000, 10).unwrap();

        // Index entry with no ladder counterpart
        book.index
            .insert(99, OrderRecord::new(Side::Ask, px("5"), 1, 99))
            .unwrap();
        assert!(matches!(book.check_invariants(), Err(BookError::Inconsistent(_))));
    }

    #[test]
    fn test_new_order_level_overflow_rejected() {
        let mut book = checked_book();
        book.on_new_order(Side::Ask, px("1.00"), Quantity::MAX, 1).unwrap();
        let before = snapshot(&book, &["1.00"]);

        assert_eq!(
            book.on_new_order(Side::Ask, px("1.000"), 1, 2).unwrap_err(),
            BookError::InvalidArgument(InvalidArgument::LevelOverflow {
                price: px("1.000"),
                resting: Quantity::MAX,
                added: 1,
            })
        );
        assert_eq!(snapshot(&book, &["1.00"]), before);
        assert!(!book.contains_order(2));

        // Same quantity on the other side is a different level
        book.on_new_order(Side::Bid, px("1.00"), 1, 2).unwrap();
        book.on_cancel_order(2).unwrap();

        // The cached total still matches the live order after removals
        assert_eq!(book.size_for_price_level(Side::Ask, px("1")), Quantity::MAX);
        book.on_cancel_order(1).unwrap();
        assert_eq!(book.book_depth(Side::Ask), 0);
        assert!(book.check_invariants().is_ok());
    }

    #[test]
    fn test_replace_level_overflow_rejected() {
        let mut book = checked_book();
        book.on_new_order(Side::Bid, px("1.00"), Quantity::MAX - 10, 1).unwrap();
        book.on_new_order(Side::Bid, px("2.00"), 20, 2).unwrap();
        let before = snapshot(&book, &["1.00", "2.00"]);

        // Moving 20 onto a level with 10 of room
        let err = book.on_replace_order(px("1.00"), 20, 2).unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(snapshot(&book, &["1.00", "2.00"]), before);
        assert_eq!(book.order(2).unwrap().price, px("2.00"));

        // Resizing in place only counts the other orders at the level
        book.on_replace_order(px("1.00"), Quantity::MAX, 1).unwrap();
        assert_eq!(book.size_for_price_level(Side::Bid, px("1")), Quantity::MAX);

        book.on_replace_order(px("1.00"), 10, 1).unwrap();
        book.on_replace_order(px("1.00"), 20, 2).unwrap();
        assert_eq!(book.size_for_price_level(Side::Bid, px("1")), 30);
        assert!(book.check_invariants().is_ok());
    }

    #[test]
    fn test_clear() {
        let mut book = OrderBookEngine::new();
        book.on_new_order(Side::Bid, px("1.00"), 1000, 10).unwrap();
        book.on_new_order(Side::Ask, px("2.00"), 1000, 11).unwrap();

        book.clear();
        assert!(book.is_empty());
        assert_eq!(book.book_depth(Side::Bid), 0);
        assert_eq!(book.book_depth(Side::Ask), 0);
        assert!(book.check_invariants().is_ok());
    }
}
