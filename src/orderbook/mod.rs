//! Order book storage for the Level 2 view.
//!
//! ## Architecture
//!
//! Two coupled structures, kept consistent by the engine:
//!
//! - **OrderIndex**: order id -> current record (slab + HashMap, O(1))
//! - **PriceLadder**: one per side, price -> ids resting there (BTreeMap, O(log n))
//!
//! ## Components
//!
//! - [`OrderIndex`]: Source of truth for which ids are resting
//! - [`PriceLevel`]: Ids at one price with a cached total quantity
//! - [`PriceLadder`]: Sorted levels for one side, best price first
//!
//! ## Example
//!
//! ```
//! use level2_book::orderbook::BidLadder;
//! use level2_book::types::price::parse_price;
//!
//! let mut bids = BidLadder::new();
//! bids.add(10, parse_price("1.00").unwrap(), 1000).unwrap();
//! bids.add(12, parse_price("1.05").unwrap(), 2000).unwrap();
//!
//! assert_eq!(bids.top_of_book(), parse_price("1.05"));
//! assert_eq!(bids.depth(), 2);
//! ```

pub mod index;
pub mod ladder;
pub mod level;

pub use index::OrderIndex;
pub use ladder::{AskLadder, AskPriority, BidLadder, BidPriority, LadderPriority, PriceLadder};
pub use level::PriceLevel;
