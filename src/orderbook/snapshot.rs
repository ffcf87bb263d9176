//! Market data snapshots: top-of-book and depth views of a single book.

use crate::orderbook::error::OrderBookError;
use crate::pricelevel::{Price, Quantity, SymbolId};
use serde::{Deserialize, Serialize};

/// Top-of-book snapshot plus cumulative statistics, emitted after every
/// mutating operation and answerable on demand.
///
/// Absent values are zero-filled: a book with no bids reports
/// `best_bid_price == 0` and `best_bid_quantity == 0`, and a symbol with
/// no book yet yields an entirely zeroed snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketDataSnapshot {
    /// Instrument this snapshot describes.
    pub symbol_id: SymbolId,
    /// Microseconds since epoch at snapshot time.
    pub timestamp: u64,
    /// Highest resting bid price, 0 when the bid side is empty.
    pub best_bid_price: Price,
    /// Aggregate quantity at the best bid.
    pub best_bid_quantity: Quantity,
    /// Lowest resting ask price, 0 when the ask side is empty.
    pub best_ask_price: Price,
    /// Aggregate quantity at the best ask.
    pub best_ask_quantity: Quantity,
    /// Price of the most recent fill, 0 before the first trade.
    pub last_trade_price: Price,
    /// Quantity of the most recent fill, 0 before the first trade.
    pub last_trade_quantity: Quantity,
    /// Cumulative executed volume on this book.
    pub volume: Quantity,
}

impl MarketDataSnapshot {
    /// Creates a zero-filled snapshot for `symbol_id`.
    pub fn empty(symbol_id: SymbolId) -> Self {
        Self {
            symbol_id,
            timestamp: 0,
            best_bid_price: 0,
            best_bid_quantity: 0,
            best_ask_price: 0,
            best_ask_quantity: 0,
            last_trade_price: 0,
            last_trade_quantity: 0,
            volume: 0,
        }
    }

    /// Best bid as `(price, quantity)`, `None` when the bid side is empty.
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        (self.best_bid_quantity > 0).then_some((self.best_bid_price, self.best_bid_quantity))
    }

    /// Best ask as `(price, quantity)`, `None` when the ask side is empty.
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        (self.best_ask_quantity > 0).then_some((self.best_ask_price, self.best_ask_quantity))
    }

    /// Mid price (average of best bid and best ask).
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// Spread (best ask - best bid).
    pub fn spread(&self) -> Option<Price> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid, _)), Some((ask, _))) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }
}

/// One price level as seen in a depth snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// The level's price.
    pub price: Price,
    /// Aggregate resting quantity at this price.
    pub quantity: Quantity,
    /// Number of orders queued at this price.
    pub order_count: usize,
}

/// A depth snapshot of one book: the top-N levels per side at a point in
/// time, bids best-first (descending) and asks best-first (ascending).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthSnapshot {
    /// Instrument this snapshot describes.
    pub symbol_id: SymbolId,
    /// Microseconds since epoch at snapshot time.
    pub timestamp: u64,
    /// Bid levels, highest price first.
    pub bids: Vec<LevelSnapshot>,
    /// Ask levels, lowest price first.
    pub asks: Vec<LevelSnapshot>,
}

impl DepthSnapshot {
    /// Best bid level, if any.
    pub fn best_bid(&self) -> Option<&LevelSnapshot> {
        self.bids.first()
    }

    /// Best ask level, if any.
    pub fn best_ask(&self) -> Option<&LevelSnapshot> {
        self.asks.first()
    }

    /// Mid price from the best levels.
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid.price as f64 + ask.price as f64) / 2.0),
            _ => None,
        }
    }

    /// Serializes the snapshot to a JSON string.
    pub fn to_json(&self) -> Result<String, OrderBookError> {
        serde_json::to_string(self).map_err(|e| OrderBookError::SerializationError {
            message: e.to_string(),
        })
    }

    /// Restores a snapshot from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, OrderBookError> {
        serde_json::from_str(json).map_err(|e| OrderBookError::DeserializationError {
            message: e.to_string(),
        })
    }
}
