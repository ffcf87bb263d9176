//! Trade records and subscriber callback types.

use crate::orderbook::snapshot::MarketDataSnapshot;
use crate::pricelevel::{OrderId, Price, Quantity, SymbolId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Immutable record of one fill between a buy and a sell order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Monotonic per-book trade identifier, starting at 1.
    pub trade_id: u64,
    /// Instrument the fill occurred on.
    pub symbol_id: SymbolId,
    /// The buy-side order of this fill.
    pub buy_order_id: OrderId,
    /// The sell-side order of this fill.
    pub sell_order_id: OrderId,
    /// Executed quantity, always > 0.
    pub quantity: Quantity,
    /// Execution price: the resting order's price. The aggressor may
    /// receive price improvement versus its own limit.
    pub price: Price,
    /// Microseconds since epoch at execution.
    pub timestamp: u64,
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trade[{} sym={} buy={} sell={} {}@{}]",
            self.trade_id,
            self.symbol_id,
            self.buy_order_id,
            self.sell_order_id,
            self.quantity,
            self.price
        )
    }
}

/// Trade subscriber callback, shared via Arc so listener lists can be
/// snapshotted and invoked without holding any engine lock.
pub type TradeListener = Arc<dyn Fn(&Trade) + Send + Sync>;

/// Market data subscriber callback.
pub type MarketDataListener = Arc<dyn Fn(&MarketDataSnapshot) + Send + Sync>;

/// A trade enriched with routing metadata, as delivered on the
/// centralized trade channel.
#[derive(Debug, Clone, Copy)]
pub struct TradeEvent {
    /// The instrument this event belongs to.
    pub symbol_id: SymbolId,
    /// The underlying fill.
    pub trade: Trade,
    /// Microseconds since epoch when the router picked the trade up.
    pub received_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_trade() -> Trade {
        Trade {
            trade_id: 1,
            symbol_id: 100,
            buy_order_id: 2,
            sell_order_id: 1,
            quantity: 1000,
            price: 5000,
            timestamp: 1_700_000_000_000_000,
        }
    }

    #[test]
    fn test_trade_display() {
        let trade = make_trade();
        assert_eq!(trade.to_string(), "Trade[1 sym=100 buy=2 sell=1 1000@5000]");
    }

    #[test]
    fn test_trade_serde_round_trip() {
        let trade = make_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(back, trade);
    }
}
