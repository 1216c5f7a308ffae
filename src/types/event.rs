//! Book events and their compact text form.
//!
//! ## Format
//!
//! ```text
//! N#B:1.00:1000:10    new order: side:price:quantity:id
//! C#10                cancel: id
//! R#1.00:600:12       replace: price:quantity:id
//! T#600:10            trade: quantity:resting id
//! ```
//!
//! The long kind names `New`, `Cancel`, `Replace` and `Trade` are accepted
//! in place of the single letters. Parsing only checks the shape of the
//! line; range checks (negative price, zero quantity) belong to the engine.

use std::fmt;
use std::str::FromStr;

use crate::error::{BookError, Result};
use crate::types::price::{parse_price, Price};
use crate::types::{OrderId, Quantity, Side};

/// One order lifecycle event for a single instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookEvent {
    New {
        side: Side,
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    },
    Cancel {
        order_id: OrderId,
    },
    Replace {
        price: Price,
        quantity: Quantity,
        order_id: OrderId,
    },
    Trade {
        quantity: Quantity,
        order_id: OrderId,
    },
}

impl BookEvent {
    /// The order id the event refers to.
    pub fn order_id(&self) -> OrderId {
        match *self {
            BookEvent::New { order_id, .. }
            | BookEvent::Cancel { order_id }
            | BookEvent::Replace { order_id, .. }
            | BookEvent::Trade { order_id, .. } => order_id,
        }
    }

    /// Short kind name, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            BookEvent::New { .. } => "new",
            BookEvent::Cancel { .. } => "cancel",
            BookEvent::Replace { .. } => "replace",
            BookEvent::Trade { .. } => "trade",
        }
    }
}

impl fmt::Display for BookEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookEvent::New {
                side,
                price,
                quantity,
                order_id,
            } => write!(f, "N#{}:{}:{}:{}", side.code(), price, quantity, order_id),
            BookEvent::Cancel { order_id } => write!(f, "C#{order_id}"),
            BookEvent::Replace {
                price,
                quantity,
                order_id,
            } => write!(f, "R#{price}:{quantity}:{order_id}"),
            BookEvent::Trade { quantity, order_id } => write!(f, "T#{quantity}:{order_id}"),
        }
    }
}

impl FromStr for BookEvent {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self> {
        let line = s.trim();
        let (kind, body) = line
            .split_once('#')
            .ok_or_else(|| BookError::parse(line, "missing '#' separator"))?;
        let fields = Fields::new(line, body);

        let event = match kind {
            "N" | "New" => {
                fields.expect_len(4)?;
                BookEvent::New {
                    side: fields.side(0)?,
                    price: fields.price(1)?,
                    quantity: fields.int(2)?,
                    order_id: fields.int(3)?,
                }
            }
            "C" | "Cancel" => {
                fields.expect_len(1)?;
                BookEvent::Cancel {
                    order_id: fields.int(0)?,
                }
            }
            "R" | "Replace" => {
                fields.expect_len(3)?;
                BookEvent::Replace {
                    price: fields.price(0)?,
                    quantity: fields.int(1)?,
                    order_id: fields.int(2)?,
                }
            }
            "T" | "Trade" => {
                fields.expect_len(2)?;
                BookEvent::Trade {
                    quantity: fields.int(0)?,
                    order_id: fields.int(1)?,
                }
            }
            other => return Err(BookError::parse(line, format!("unknown kind {other:?}"))),
        };
        Ok(event)
    }
}

/// Colon separated fields of one event line.
struct Fields<'a> {
    line: &'a str,
    parts: Vec<&'a str>,
}

impl<'a> Fields<'a> {
    fn new(line: &'a str, body: &'a str) -> Self {
        Self {
            line,
            parts: body.split(':').map(str::trim).collect(),
        }
    }

    fn expect_len(&self, n: usize) -> Result<()> {
        if self.parts.len() != n {
            return Err(BookError::parse(
                self.line,
                format!("expected {n} fields, got {}", self.parts.len()),
            ));
        }
        Ok(())
    }

    fn side(&self, i: usize) -> Result<Side> {
        Side::from_code(self.parts[i])
            .ok_or_else(|| BookError::parse(self.line, format!("bad side {:?}", self.parts[i])))
    }

    fn price(&self, i: usize) -> Result<Price> {
        parse_price(self.parts[i])
            .ok_or_else(|| BookError::parse(self.line, format!("bad price {:?}", self.parts[i])))
    }

    fn int(&self, i: usize) -> Result<i64> {
        self.parts[i]
            .parse()
            .map_err(|e| BookError::parse(self.line, format!("bad integer {:?}: {e}", self.parts[i])))
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn px(s: &str) -> Price {
        parse_price(s).unwrap()
    }

    #[test]
    fn test_parse_new() {
        let event: BookEvent = "N#B:1.00:1000:10".parse().unwrap();
        assert_eq!(
            event,
            BookEvent::New {
                side: Side::Bid,
                price: px("1.00"),
                quantity: 1000,
                order_id: 10,
            }
        );
        assert_eq!(event.order_id(), 10);
        assert_eq!(event.kind(), "new");
    }

    #[test]
    fn test_parse_long_names() {
        let event: BookEvent = "New#A:2.000:5:1".parse().unwrap();
        assert!(matches!(event, BookEvent::New { side: Side::Ask, .. }));
        assert_eq!("Cancel#7".parse::<BookEvent>().unwrap(), BookEvent::Cancel { order_id: 7 });
        assert_eq!(
            "Replace#2.00:600:12".parse::<BookEvent>().unwrap(),
            BookEvent::Replace {
                price: px("2"),
                quantity: 600,
                order_id: 12,
            }
        );
        assert_eq!(
            "Trade#400:10".parse::<BookEvent>().unwrap(),
            BookEvent::Trade {
                quantity: 400,
                order_id: 10,
            }
        );
    }

    #[test]
    fn test_parse_keeps_out_of_range_values() {
        // The engine, not the parser, rejects these
        let event: BookEvent = "N#A:-1.00:-1000:14".parse().unwrap();
        assert_eq!(
            event,
            BookEvent::New {
                side: Side::Ask,
                price: px("-1.00"),
                quantity: -1000,
                order_id: 14,
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "X#1", "N#B:1.00:1000", "N#Q:1.00:1000:10", "C#abc", "T#1:2:3", "N-B:1:1:1"] {
            let err = bad.parse::<BookEvent>().unwrap_err();
            assert!(matches!(err, BookError::Parse { .. }), "{bad:?} gave {err:?}");
        }
    }

    #[test]
    fn test_display_matches_format() {
        let lines = ["N#B:1.00:1000:10", "C#10", "R#1.00:600:12", "T#600:10"];
        for line in lines {
            let event: BookEvent = line.parse().unwrap();
            assert_eq!(event.to_string(), line);
        }
    }
}
