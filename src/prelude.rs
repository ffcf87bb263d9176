//! Prelude module that re-exports commonly used types and traits.
//!
//! Instead of importing each type individually, you can use:
//!
//! ```rust
//! use matchbook::prelude::*;
//! ```

// Core order book types
pub use crate::orderbook::OrderBook;
pub use crate::orderbook::OrderBookError;
pub use crate::orderbook::registry::BookRegistry;
pub use crate::orderbook::router::{TradeRouterStd, TradeRouterTokio};

// Snapshot types
pub use crate::orderbook::snapshot::{DepthSnapshot, LevelSnapshot, MarketDataSnapshot};

// Trade-related types
pub use crate::orderbook::trade::{MarketDataListener, Trade, TradeEvent, TradeListener};

// Order domain types
pub use crate::pricelevel::{
    Order, OrderId, OrderStatus, OrderType, Price, PriceLevel, Quantity, Side, SymbolId,
};

// Facade and synthetic flow
pub use crate::flow::{default_universe, FlowConfig, FlowGenerator};
pub use crate::simulator::{PerformanceMetrics, Simulator};

// Utility functions
pub use crate::utils::current_time_micros;
