//! # Matchbook: a price-time priority matching engine
//!
//! A continuous limit order book matching engine for simulated trading
//! venues, written in Rust. Per symbol it maintains the set of resting
//! buy and sell orders, matches incoming orders against resting liquidity
//! under deterministic priority rules, emits executed trades, and
//! publishes top-of-book and depth snapshots. A multi-symbol registry
//! routes order operations to per-symbol books, and a facade assigns
//! process-wide order ids and aggregates performance metrics.
//!
//! ## Key Features
//!
//! - **Price-time priority matching**: best price first, strict FIFO
//!   within a price. Every fill executes at the resting order's price, so
//!   aggressive limit orders can receive price improvement.
//! - **Limit, market and stop orders**: market residuals never rest; stop
//!   orders are accepted and matched as limit orders (true stop
//!   triggering is a future extension).
//! - **Deterministic per-symbol ordering**: the match loop runs under
//!   exclusive acquisition of a book-wide lock, so all observers of one
//!   symbol see operations in a single total order and the book is never
//!   crossed at rest.
//! - **Subscriber fan-out**: per-symbol trade and market data callbacks,
//!   invoked outside every engine lock with per-subscriber panic
//!   isolation, plus centralized trade routing over std or Tokio
//!   channels.
//! - **Multi-symbol coordination**: books materialize lazily on first
//!   reference; cancel and modify are addressed by order id alone and fan
//!   out across books.
//! - **Built-in metrics and synthetic flow**: aggregate volume, trade
//!   count and submit latency, and a seedable random order flow generator
//!   for benchmarks and demos.
//!
//! ## Concurrency Model
//!
//! The engine is a passive shared data structure: operations execute on
//! the caller's thread, there is no internal worker driving order
//! processing, and the only suspension points are lock acquisitions. Each
//! book pairs a read-write-locked price ladder (exclusive for matching
//! and mutation, shared for snapshots) with a concurrent order index;
//! listener lists live behind their own mutex so callbacks can re-enter
//! the engine without deadlocking.
//!
//! ## Example
//!
//! ```
//! use matchbook::{OrderType, Side, Simulator};
//!
//! let simulator = Simulator::new();
//!
//! // Rest an ask, then cross it with a buy.
//! let ask = simulator.submit_order(100, Side::Sell, OrderType::Limit, 1000, 5000);
//! let bid = simulator.submit_order(100, Side::Buy, OrderType::Limit, 1000, 5000);
//!
//! let metrics = simulator.performance_metrics();
//! assert_eq!(metrics.trade_count, 1);
//! assert_eq!(metrics.total_volume, 1000);
//!
//! let snapshot = simulator.market_data(100);
//! assert_eq!(snapshot.last_trade_price, 5000);
//! assert!(simulator.get_order(ask).unwrap().is_filled());
//! assert!(simulator.get_order(bid).unwrap().is_filled());
//! ```

/// Synthetic order flow generation.
pub mod flow;
pub mod orderbook;
/// Order domain types and the per-price FIFO level.
pub mod pricelevel;
pub mod prelude;
/// The simulator facade over the multi-symbol registry.
pub mod simulator;
mod utils;

pub use flow::{default_universe, FlowConfig, FlowGenerator};
pub use orderbook::registry::BookRegistry;
pub use orderbook::router::{TradeRouterStd, TradeRouterTokio};
pub use orderbook::snapshot::{DepthSnapshot, LevelSnapshot, MarketDataSnapshot};
pub use orderbook::trade::{MarketDataListener, Trade, TradeEvent, TradeListener};
pub use orderbook::{OrderBook, OrderBookError};
pub use pricelevel::{
    Order, OrderId, OrderStatus, OrderType, Price, PriceLevel, Quantity, Side, SymbolId,
};
pub use simulator::{PerformanceMetrics, Simulator};
pub use utils::current_time_micros;
