//! Core OrderBook implementation: the per-symbol ladders, order index,
//! statistics and subscriber fan-out.

use super::snapshot::{DepthSnapshot, LevelSnapshot, MarketDataSnapshot};
use super::trade::{MarketDataListener, Trade, TradeListener};
use crate::pricelevel::{Order, OrderId, Price, PriceLevel, Quantity, Side, SymbolId};
use crate::utils::current_time_micros;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::error;

/// The two price ladders of one book.
///
/// Best bid is the highest key of `bids`; best ask the lowest key of
/// `asks`. The whole struct sits behind the book's read-write lock: the
/// match loop takes it exclusively, snapshot queries take it shared, so
/// every observer of one symbol sees operations in a single total order.
#[derive(Debug, Default)]
pub(super) struct Ladder {
    pub(super) bids: BTreeMap<Price, PriceLevel>,
    pub(super) asks: BTreeMap<Price, PriceLevel>,
}

impl Ladder {
    pub(super) fn side_mut(&mut self, side: Side) -> &mut BTreeMap<Price, PriceLevel> {
        match side {
            Side::Buy => &mut self.bids,
            Side::Sell => &mut self.asks,
        }
    }
}

/// A price-time-priority order book for a single symbol.
///
/// The book is a passive shared structure: all operations execute on the
/// caller's thread. Orders are retained in the id index after reaching a
/// terminal state so id-based cancel/modify stay answerable and fills
/// remain auditable; the index is the only structure that grows with
/// lifetime order volume.
pub struct OrderBook {
    /// The instrument this book trades.
    symbol_id: SymbolId,

    /// Bid and ask ladders, protected by one book-wide read-write lock.
    pub(super) ladder: RwLock<Ladder>,

    /// All orders ever routed to this book, keyed by id. Terminal orders
    /// stay; live orders also appear in exactly one price level.
    pub(super) orders: DashMap<OrderId, Order>,

    /// Generator for sequential trade ids, starting at 1.
    pub(super) next_trade_id: AtomicU64,

    /// Cumulative executed quantity.
    pub(super) total_volume: AtomicU64,

    /// Number of fills executed.
    pub(super) trade_count: AtomicU64,

    /// The price of the most recent fill.
    pub(super) last_trade_price: AtomicU64,

    /// The quantity of the most recent fill.
    pub(super) last_trade_quantity: AtomicU64,

    /// Flag indicating whether any trade has occurred.
    pub(super) has_traded: AtomicBool,

    /// Market data subscribers, behind their own mutex so registration
    /// never contends with the ladder lock.
    market_data_listeners: Mutex<Vec<MarketDataListener>>,

    /// Trade subscribers.
    trade_listeners: Mutex<Vec<TradeListener>>,
}

impl OrderBook {
    /// Creates a new order book for the given symbol.
    pub fn new(symbol_id: SymbolId) -> Self {
        Self {
            symbol_id,
            ladder: RwLock::new(Ladder::default()),
            orders: DashMap::new(),
            next_trade_id: AtomicU64::new(1),
            total_volume: AtomicU64::new(0),
            trade_count: AtomicU64::new(0),
            last_trade_price: AtomicU64::new(0),
            last_trade_quantity: AtomicU64::new(0),
            has_traded: AtomicBool::new(false),
            market_data_listeners: Mutex::new(Vec::new()),
            trade_listeners: Mutex::new(Vec::new()),
        }
    }

    /// Creates a new order book with a trade listener already attached.
    pub fn with_trade_listener(symbol_id: SymbolId, trade_listener: TradeListener) -> Self {
        let book = Self::new(symbol_id);
        book.trade_listeners.lock().push(trade_listener);
        book
    }

    /// The symbol this book trades.
    #[inline]
    pub fn symbol_id(&self) -> SymbolId {
        self.symbol_id
    }

    /// Registers a market data subscriber. Every mutating operation emits
    /// one snapshot reflecting the post-operation state.
    pub fn register_market_data_listener(&self, listener: MarketDataListener) {
        self.market_data_listeners.lock().push(listener);
    }

    /// Registers a trade subscriber. Fills are delivered in the order the
    /// match loop produced them.
    pub fn register_trade_listener(&self, listener: TradeListener) {
        self.trade_listeners.lock().push(listener);
    }

    /// Get the best bid as `(price, quantity)`, if any.
    pub fn best_bid(&self) -> Option<(Price, Quantity)> {
        let ladder = self.ladder.read();
        ladder
            .bids
            .iter()
            .next_back()
            .map(|(price, level)| (*price, level.total_quantity()))
    }

    /// Get the best ask as `(price, quantity)`, if any.
    pub fn best_ask(&self) -> Option<(Price, Quantity)> {
        let ladder = self.ladder.read();
        ladder
            .asks
            .iter()
            .next()
            .map(|(price, level)| (*price, level.total_quantity()))
    }

    /// Get the spread (best ask - best bid).
    pub fn spread(&self) -> Option<Price> {
        let ladder = self.ladder.read();
        let bid = ladder.bids.keys().next_back()?;
        let ask = ladder.asks.keys().next()?;
        Some(ask.saturating_sub(*bid))
    }

    /// Get the mid price (average of best bid and best ask).
    pub fn mid_price(&self) -> Option<f64> {
        let ladder = self.ladder.read();
        let bid = ladder.bids.keys().next_back()?;
        let ask = ladder.asks.keys().next()?;
        Some((*bid as f64 + *ask as f64) / 2.0)
    }

    /// The price of the most recent fill, if any trade has occurred.
    pub fn last_trade_price(&self) -> Option<Price> {
        self.has_traded
            .load(Ordering::Relaxed)
            .then(|| self.last_trade_price.load(Ordering::Relaxed))
    }

    /// Cumulative executed quantity on this book.
    #[inline]
    pub fn total_volume(&self) -> Quantity {
        self.total_volume.load(Ordering::Relaxed)
    }

    /// Number of fills executed on this book.
    #[inline]
    pub fn trade_count(&self) -> u64 {
        self.trade_count.load(Ordering::Relaxed)
    }

    /// Number of orders held in the id index, terminal orders included.
    #[inline]
    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Looks up an order by id, returning a snapshot of its current state.
    pub fn get_order(&self, order_id: OrderId) -> Option<Order> {
        self.orders.get(&order_id).map(|entry| entry.value().clone())
    }

    /// Returns a consistent top-of-book snapshot at call time.
    pub fn market_data(&self) -> MarketDataSnapshot {
        let ladder = self.ladder.read();
        self.snapshot_with_ladder(&ladder)
    }

    /// Up to `depth` best bid levels as `(price, quantity)`, highest first.
    pub fn bid_levels(&self, depth: usize) -> Vec<(Price, Quantity)> {
        let ladder = self.ladder.read();
        ladder
            .bids
            .iter()
            .rev()
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Up to `depth` best ask levels as `(price, quantity)`, lowest first.
    pub fn ask_levels(&self, depth: usize) -> Vec<(Price, Quantity)> {
        let ladder = self.ladder.read();
        ladder
            .asks
            .iter()
            .take(depth)
            .map(|(price, level)| (*price, level.total_quantity()))
            .collect()
    }

    /// Builds a depth snapshot of the top `depth` levels per side.
    pub fn create_depth_snapshot(&self, depth: usize) -> DepthSnapshot {
        let ladder = self.ladder.read();
        let bids = ladder
            .bids
            .iter()
            .rev()
            .take(depth)
            .map(|(price, level)| LevelSnapshot {
                price: *price,
                quantity: level.total_quantity(),
                order_count: level.order_count(),
            })
            .collect();
        let asks = ladder
            .asks
            .iter()
            .take(depth)
            .map(|(price, level)| LevelSnapshot {
                price: *price,
                quantity: level.total_quantity(),
                order_count: level.order_count(),
            })
            .collect();
        DepthSnapshot {
            symbol_id: self.symbol_id,
            timestamp: current_time_micros(),
            bids,
            asks,
        }
    }

    /// Builds a snapshot from ladder state the caller already holds.
    ///
    /// Used by mutating operations to capture the post-operation state
    /// while still inside the write lock; the book lock is not reentrant.
    pub(super) fn snapshot_with_ladder(&self, ladder: &Ladder) -> MarketDataSnapshot {
        let mut snapshot = MarketDataSnapshot::empty(self.symbol_id);
        snapshot.timestamp = current_time_micros();

        if let Some((price, level)) = ladder.bids.iter().next_back() {
            snapshot.best_bid_price = *price;
            snapshot.best_bid_quantity = level.total_quantity();
        }
        if let Some((price, level)) = ladder.asks.iter().next() {
            snapshot.best_ask_price = *price;
            snapshot.best_ask_quantity = level.total_quantity();
        }
        if self.has_traded.load(Ordering::Relaxed) {
            snapshot.last_trade_price = self.last_trade_price.load(Ordering::Relaxed);
            snapshot.last_trade_quantity = self.last_trade_quantity.load(Ordering::Relaxed);
        }
        snapshot.volume = self.total_volume.load(Ordering::Relaxed);
        snapshot
    }

    /// Delivers a trade to every subscriber.
    ///
    /// The listener list is snapshotted first so callbacks run with no
    /// engine lock held; a subscriber may re-enter the book. A panicking
    /// subscriber is isolated: it is logged and never affects book state
    /// or its peers.
    pub(super) fn notify_trade(&self, trade: &Trade) {
        let listeners: Vec<TradeListener> = self.trade_listeners.lock().clone();
        for listener in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(trade))).is_err() {
                error!(
                    symbol_id = self.symbol_id,
                    trade_id = trade.trade_id,
                    "trade listener panicked; subscriber skipped"
                );
            }
        }
    }

    /// Delivers a market data snapshot to every subscriber, with the same
    /// isolation rules as [`Self::notify_trade`].
    pub(super) fn notify_market_data(&self, snapshot: &MarketDataSnapshot) {
        let listeners: Vec<MarketDataListener> = self.market_data_listeners.lock().clone();
        for listener in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(snapshot))).is_err() {
                error!(
                    symbol_id = self.symbol_id,
                    "market data listener panicked; subscriber skipped"
                );
            }
        }
    }

    /// Records a fill in the book statistics and mints its trade record.
    pub(super) fn record_trade(
        &self,
        buy_order_id: OrderId,
        sell_order_id: OrderId,
        quantity: Quantity,
        price: Price,
    ) -> Trade {
        self.total_volume.fetch_add(quantity, Ordering::Relaxed);
        self.trade_count.fetch_add(1, Ordering::Relaxed);
        self.last_trade_price.store(price, Ordering::Relaxed);
        self.last_trade_quantity.store(quantity, Ordering::Relaxed);
        self.has_traded.store(true, Ordering::Relaxed);

        Trade {
            trade_id: self.next_trade_id.fetch_add(1, Ordering::Relaxed),
            symbol_id: self.symbol_id,
            buy_order_id,
            sell_order_id,
            quantity,
            price,
            timestamp: current_time_micros(),
        }
    }
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("symbol_id", &self.symbol_id)
            .field("orders", &self.orders.len())
            .field("total_volume", &self.total_volume())
            .field("trade_count", &self.trade_count())
            .finish()
    }
}
