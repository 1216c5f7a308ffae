//! # Level 2 Book
//!
//! Live Level 2 view of a limit order book for one instrument: the
//! aggregated resting quantity at each price, per side, maintained
//! incrementally from new / cancel / replace / trade events.
//!
//! ## Architecture
//!
//! - **Types**: Side, OrderRecord, BookEvent, exact decimal prices
//! - **OrderBook**: id index (slab) and per-side price ladders (BTreeMap)
//! - **Engine**: the scalable engine and a scan-based reference engine
//!
//! ## Design Principles
//!
//! 1. **Exact prices**: `rust_decimal`, compared by value (`2.00 == 2.000`)
//! 2. **Validate then apply**: a rejected event never changes the book
//! 3. **Typed failures**: `DuplicateId`, `MissingId`, `InvalidArgument`
//! 4. **Single writer**: one engine per instrument, no locking
//!
//! ## Performance
//!
//! - Id lookup: O(1)
//! - New / cancel / replace / trade: O(log n) in price levels
//! - Top of book, depth, size at price: O(log n) or better

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Side, OrderRecord, BookEvent, Price
pub mod types;

/// Book storage: order index, price levels, ladders
pub mod orderbook;

/// Engines: OrderBookEngine, ReferenceEngine, Level2View
pub mod engine;

/// Engine configuration
pub mod config;

/// Error types
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use config::BookConfig;
pub use engine::{Applied, Level2View, OrderBookEngine, ReferenceEngine};
pub use error::{BookError, InvalidArgument, Result};
pub use orderbook::{OrderIndex, PriceLadder, PriceLevel};
pub use types::{BookEvent, OrderId, OrderRecord, Price, Quantity, Side};
