//! Core data types for the Level 2 book
//!
//! ## Types
//!
//! - [`OrderRecord`]: Immutable snapshot of a resting order
//! - [`Side`]: Bid or Ask
//! - [`BookEvent`]: New / Cancel / Replace / Trade
//! - [`Price`]: Exact decimal price (`rust_decimal::Decimal`)
//!
//! ## Price Equality
//!
//! Prices compare by value, never by representation: `2.00` and `2.000`
//! are the same level.

mod event;
mod order;
pub mod price;

// Re-export all types at module level
pub use event::BookEvent;
pub use order::{OrderId, OrderRecord, Quantity, Side};
pub use price::Price;
