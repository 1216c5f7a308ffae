//! Order id index.
//!
//! ## Architecture
//!
//! - **Slab**: Pre-allocated storage for `OrderRecord`s, O(1) insert/remove
//! - **HashMap**: Order id to slab key mapping, O(1) lookup
//!
//! The index is the single source of truth for "is this id resting" and
//! "what side/price/quantity does it have now". An id is present if and
//! only if the order is resting.
//!
//! ## Slab Integration
//!
//! Per slab docs (https://docs.rs/slab/0.4.11):
//! - Keys are reused after removal
//! - `Slab::with_capacity(n)` pre-allocates n slots

use std::collections::HashMap;

use slab::Slab;

use crate::error::{BookError, Result};
use crate::types::{OrderId, OrderRecord};

/// Mapping from order id to its current record.
#[derive(Debug, Default)]
pub struct OrderIndex {
    /// Record storage
    records: Slab<OrderRecord>,

    /// Order id to slab key
    keys: HashMap<OrderId, usize>,
}

impl OrderIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an index with room for `capacity` resting orders
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Slab::with_capacity(capacity),
            keys: HashMap::with_capacity(capacity),
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    /// Number of resting orders
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Check if nothing is resting
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Pre-allocated record slots
    #[inline]
    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Store a record under `order_id`.
    ///
    /// # Errors
    ///
    /// `DuplicateId` if the id is already resting. The index is unchanged.
    pub fn insert(&mut self, order_id: OrderId, record: OrderRecord) -> Result<()> {
        if self.keys.contains_key(&order_id) {
            return Err(BookError::DuplicateId(order_id));
        }
        let key = self.records.insert(record);
        self.keys.insert(order_id, key);
        Ok(())
    }

    /// Remove and return the record for `order_id`.
    ///
    /// # Errors
    ///
    /// `MissingId` if the id is not resting.
    pub fn remove(&mut self, order_id: OrderId) -> Result<OrderRecord> {
        let key = self
            .keys
            .remove(&order_id)
            .ok_or(BookError::MissingId(order_id))?;
        Ok(self.records.remove(key))
    }

    /// Current record for `order_id`
    #[inline]
    pub fn get(&self, order_id: OrderId) -> Option<&OrderRecord> {
        let key = *self.keys.get(&order_id)?;
        self.records.get(key)
    }

    /// Replace the record for a resting id, returning the prior value.
    ///
    /// # Errors
    ///
    /// `MissingId` if the id is not resting. Nothing is stored.
    pub fn replace(&mut self, order_id: OrderId, record: OrderRecord) -> Result<OrderRecord> {
        let key = *self
            .keys
            .get(&order_id)
            .ok_or(BookError::MissingId(order_id))?;
        let slot = self
            .records
            .get_mut(key)
            .ok_or_else(|| BookError::inconsistent(format!("dangling slab key for id {order_id}")))?;
        Ok(std::mem::replace(slot, record))
    }

    /// Check if an order is resting
    #[inline]
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.keys.contains_key(&order_id)
    }

    /// Iterate over all resting records (unordered)
    pub fn iter(&self) -> impl Iterator<Item = &OrderRecord> + '_ {
        self.records.iter().map(|(_, record)| record)
    }

    /// Drop every record
    pub fn clear(&mut self) {
        self.records.clear();
        self.keys.clear();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
