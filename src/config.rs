//! Engine configuration.

/// Construction options for [`OrderBookEngine`](crate::engine::OrderBookEngine).
///
/// ## Example
///
/// ```
/// use level2_book::BookConfig;
///
/// let config = BookConfig::default()
///     .with_order_capacity(100_000)
///     .with_verify_invariants(true);
///
/// assert_eq!(config.order_capacity, 100_000);
/// assert!(config.verify_invariants);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookConfig {
    /// Resting orders to pre-allocate room for
    pub order_capacity: usize,

    /// Run `check_invariants` after every successful mutation.
    /// Costs O(total orders) per event; meant for debugging and tests.
    pub verify_invariants: bool,
}

impl BookConfig {
    /// Default pre-allocated order slots
    pub const DEFAULT_ORDER_CAPACITY: usize = 1024;

    /// Set the pre-allocated order capacity
    #[must_use]
    pub fn with_order_capacity(mut self, order_capacity: usize) -> Self {
        self.order_capacity = order_capacity;
        self
    }

    /// Enable or disable per-event invariant checks
    #[must_use]
    pub fn with_verify_invariants(mut self, verify_invariants: bool) -> Self {
        self.verify_invariants = verify_invariants;
        self
    }
}

impl Default for BookConfig {
    fn default() -> Self {
        Self {
            order_capacity: Self::DEFAULT_ORDER_CAPACITY,
            verify_invariants: false,
        }
    }
}
