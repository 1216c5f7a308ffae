//! Price and quantity validation.
//!
//! ## Overview
//!
//! Prices are `rust_decimal::Decimal` values. Two prices denote the same
//! level when they are equal in VALUE, whatever their scale: `2.00`,
//! `2.000` and `2` are one level. `Decimal`'s `Eq`, `Ord` and `Hash` are
//! already value based, so it can key a `BTreeMap` directly.
//!
//! ## Examples
//!
//! ```
//! use level2_book::types::price::parse_price;
//!
//! let a = parse_price("2.00").unwrap();
//! let b = parse_price("2.000").unwrap();
//! assert_eq!(a, b);
//! assert_eq!(a.to_string(), "2.00");
//! ```

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::{InvalidArgument, Result};
use crate::types::Quantity;

/// Price of a level. Opaque, exact, totally ordered.
pub type Price = Decimal;

// ============================================================================
// Parsing
// ============================================================================

/// Parse a decimal string into a price.
///
/// Scientific notation is accepted as a fallback (`"1e2"`).
///
/// # Returns
///
/// * `Some(Price)` - The parsed value, scale preserved
/// * `None` - If the string is not a decimal
///
/// # Example
///
/// ```
/// use level2_book::types::price::parse_price;
///
/// assert_eq!(parse_price("1.05").unwrap().to_string(), "1.05");
/// assert!(parse_price("abc").is_none());
/// ```
pub fn parse_price(s: &str) -> Option<Price> {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .ok()
}

// ============================================================================
// Validation
// ============================================================================

/// Reject negative prices. Zero (including `-0`) is a valid price.
pub fn validate_price(price: Price) -> Result<Price> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(InvalidArgument::NegativePrice(price).into());
    }
    Ok(price)
}

/// Reject quantities that cannot rest on the book (`<= 0`).
pub fn validate_quantity(quantity: Quantity) -> Result<Quantity> {
    if quantity <= 0 {
        return Err(InvalidArgument::NonPositiveQuantity(quantity).into());
    }
    Ok(quantity)
}

/// Check a trade quantity against what is resting.
///
/// # Returns
///
/// The quantity left resting after the trade (`0` means a full fill).
pub fn validate_trade(traded: Quantity, resting: Quantity) -> Result<Quantity> {
    if traded < 0 {
        return Err(InvalidArgument::NegativeTradeQuantity(traded).into());
    }
    if traded > resting {
        return Err(InvalidArgument::TradeExceedsResting { traded, resting }.into());
    }
    Ok(resting - traded)
}

/// Check that a level holding `resting` can take `added` more.
///
/// # Returns
///
/// The new level total.
pub fn validate_level_total(price: Price, resting: Quantity, added: Quantity) -> Result<Quantity> {
    resting
        .checked_add(added)
        .ok_or_else(|| InvalidArgument::LevelOverflow { price, resting, added }.into())
}

// ============================================================================
// Unit Tests
// ============================================================================
