//! The simulator facade: process-wide order id assignment, operation
//! routing and aggregate performance metrics.

use crate::orderbook::registry::BookRegistry;
use crate::orderbook::snapshot::MarketDataSnapshot;
use crate::orderbook::trade::{MarketDataListener, TradeListener};
use crate::pricelevel::{Order, OrderId, OrderType, Price, Quantity, Side, SymbolId};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Aggregate performance metrics across all books of a simulator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceMetrics {
    /// Orders submitted through the facade.
    pub orders_processed: u64,
    /// Cumulative executed quantity across all books.
    pub total_volume: Quantity,
    /// Number of fills across all books.
    pub trade_count: u64,
    /// Mean submit latency in nanoseconds, 0.0 before the first order.
    pub average_latency_ns: f64,
}

/// The public operation surface of the venue.
///
/// Assigns monotonic order ids (starting at 1), routes operations to the
/// per-symbol books of its registry, and aggregates metrics. Orders are
/// processed synchronously on the caller's thread; the facade itself holds
/// no locks, so it can be shared freely behind an `Arc`.
pub struct Simulator {
    registry: Arc<BookRegistry>,
    next_order_id: AtomicU64,
    orders_processed: AtomicU64,
    total_latency_ns: AtomicU64,
}

impl Simulator {
    /// Creates a simulator over a fresh registry.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(BookRegistry::new()))
    }

    /// Creates a simulator over an existing registry, e.g. one built by a
    /// trade router so every book feeds the central trade channel.
    pub fn with_registry(registry: Arc<BookRegistry>) -> Self {
        Self {
            registry,
            next_order_id: AtomicU64::new(1),
            orders_processed: AtomicU64::new(0),
            total_latency_ns: AtomicU64::new(0),
        }
    }

    /// The registry backing this simulator.
    pub fn registry(&self) -> &Arc<BookRegistry> {
        &self.registry
    }

    /// Submits a new order and returns its assigned id.
    ///
    /// The order is matched synchronously before this call returns; its
    /// outcome is observable through [`Self::get_order`], the emitted
    /// trades and the market data snapshot. `price` is ignored for market
    /// orders.
    pub fn submit_order(
        &self,
        symbol_id: SymbolId,
        side: Side,
        order_type: OrderType,
        quantity: Quantity,
        price: Price,
    ) -> OrderId {
        self.submit_order_with_stop(symbol_id, side, order_type, quantity, price, 0)
    }

    /// Submits a new order carrying an explicit stop price.
    ///
    /// Stop orders are matched as limit orders at `price`; the stop price
    /// is carried but never armed.
    pub fn submit_order_with_stop(
        &self,
        symbol_id: SymbolId,
        side: Side,
        order_type: OrderType,
        quantity: Quantity,
        price: Price,
        stop_price: Price,
    ) -> OrderId {
        let started = Instant::now();
        let order_id = self.next_order_id.fetch_add(1, Ordering::Relaxed);
        let order = Order::with_stop_price(
            order_id, symbol_id, side, order_type, quantity, price, stop_price,
        );

        let book = self.registry.get_or_create(symbol_id);
        if let Err(e) = book.add_order(order) {
            // Unreachable with facade-assigned ids; surfaced for audit.
            warn!(order_id, symbol_id, "order not accepted: {e}");
        }

        self.total_latency_ns
            .fetch_add(started.elapsed().as_nanos() as u64, Ordering::Relaxed);
        self.orders_processed.fetch_add(1, Ordering::Relaxed);

        order_id
    }

    /// Cancels an order by id. Returns `false` for unknown or already
    /// terminal ids.
    pub fn cancel_order(&self, order_id: OrderId) -> bool {
        self.registry.cancel_order(order_id)
    }

    /// Modifies an order's quantity and optionally its price. The order
    /// keeps its id but surrenders its time priority.
    pub fn modify_order(
        &self,
        order_id: OrderId,
        new_quantity: Quantity,
        new_price: Option<Price>,
    ) -> bool {
        self.registry.modify_order(order_id, new_quantity, new_price)
    }

    /// Looks up an order's current state by id across all books.
    pub fn get_order(&self, order_id: OrderId) -> Option<Order> {
        self.registry.get_order(order_id)
    }

    /// Top-of-book snapshot; zero-filled for unknown symbols.
    pub fn market_data(&self, symbol_id: SymbolId) -> MarketDataSnapshot {
        self.registry.market_data(symbol_id)
    }

    /// Up to `depth` best bid levels; empty for unknown symbols.
    pub fn bid_levels(&self, symbol_id: SymbolId, depth: usize) -> Vec<(Price, Quantity)> {
        self.registry.bid_levels(symbol_id, depth)
    }

    /// Up to `depth` best ask levels; empty for unknown symbols.
    pub fn ask_levels(&self, symbol_id: SymbolId, depth: usize) -> Vec<(Price, Quantity)> {
        self.registry.ask_levels(symbol_id, depth)
    }

    /// Registers a market data subscriber for a symbol, creating its book
    /// if necessary.
    pub fn register_market_data_listener(&self, symbol_id: SymbolId, listener: MarketDataListener) {
        self.registry
            .get_or_create(symbol_id)
            .register_market_data_listener(listener);
    }

    /// Registers a trade subscriber for a symbol, creating its book if
    /// necessary.
    pub fn register_trade_listener(&self, symbol_id: SymbolId, listener: TradeListener) {
        self.registry
            .get_or_create(symbol_id)
            .register_trade_listener(listener);
    }

    /// Aggregates performance metrics across all books.
    pub fn performance_metrics(&self) -> PerformanceMetrics {
        let orders_processed = self.orders_processed.load(Ordering::Relaxed);

        let mut total_volume = 0u64;
        let mut trade_count = 0u64;
        for symbol_id in self.registry.symbols() {
            if let Some(book) = self.registry.get(symbol_id) {
                total_volume += book.total_volume();
                trade_count += book.trade_count();
            }
        }

        let average_latency_ns = if orders_processed > 0 {
            self.total_latency_ns.load(Ordering::Relaxed) as f64 / orders_processed as f64
        } else {
            0.0
        };

        PerformanceMetrics {
            orders_processed,
            total_volume,
            trade_count,
            average_latency_ns,
        }
    }
}

impl Default for Simulator {
    fn default() -> Self {
        Self::new()
    }
}
