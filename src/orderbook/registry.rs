//! Multi-symbol book registry with lazy book creation and cross-book
//! order operations.

use super::book::OrderBook;
use super::snapshot::MarketDataSnapshot;
use super::trade::TradeListener;
use crate::pricelevel::{Order, OrderId, Price, Quantity, SymbolId};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

/// Maps symbol ids to their order books, materializing a book the first
/// time a symbol is referenced by a mutating operation or a listener
/// registration. Read-only queries for unknown symbols answer with empty
/// results without creating a book.
///
/// Cancel and modify are addressed by order id alone, so the registry fans
/// the request out across its books and returns the first success. Order
/// ids assigned by the simulator facade are unique process-wide, which
/// makes the fan-out order unobservable.
pub struct BookRegistry {
    /// Books keyed by symbol. The concurrent map's entry API gives the
    /// create-once guarantee for lazy materialization.
    books: DashMap<SymbolId, Arc<OrderBook>>,

    /// Listener attached to every lazily created book, used for
    /// centralized trade routing.
    trade_listener: Option<TradeListener>,
}

impl BookRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            books: DashMap::new(),
            trade_listener: None,
        }
    }

    /// Creates a registry whose books are all wired to `trade_listener`
    /// at creation time.
    pub fn with_trade_listener(trade_listener: TradeListener) -> Self {
        Self {
            books: DashMap::new(),
            trade_listener: Some(trade_listener),
        }
    }

    /// Returns the book for `symbol_id`, if one exists.
    pub fn get(&self, symbol_id: SymbolId) -> Option<Arc<OrderBook>> {
        self.books.get(&symbol_id).map(|entry| entry.value().clone())
    }

    /// Returns the book for `symbol_id`, creating it if necessary.
    pub fn get_or_create(&self, symbol_id: SymbolId) -> Arc<OrderBook> {
        if let Some(book) = self.get(symbol_id) {
            return book;
        }
        self.books
            .entry(symbol_id)
            .or_insert_with(|| {
                info!(symbol_id, "creating order book");
                match &self.trade_listener {
                    Some(listener) => {
                        Arc::new(OrderBook::with_trade_listener(symbol_id, listener.clone()))
                    }
                    None => Arc::new(OrderBook::new(symbol_id)),
                }
            })
            .value()
            .clone()
    }

    /// Cancels an order by id, searching every book for it.
    pub fn cancel_order(&self, order_id: OrderId) -> bool {
        for entry in self.books.iter() {
            if entry.value().cancel_order(order_id) {
                return true;
            }
        }
        false
    }

    /// Modifies an order by id, searching every book for it.
    pub fn modify_order(
        &self,
        order_id: OrderId,
        new_quantity: Quantity,
        new_price: Option<Price>,
    ) -> bool {
        for entry in self.books.iter() {
            if entry.value().modify_order(order_id, new_quantity, new_price) {
                return true;
            }
        }
        false
    }

    /// Looks up an order by id across all books.
    pub fn get_order(&self, order_id: OrderId) -> Option<Order> {
        self.books
            .iter()
            .find_map(|entry| entry.value().get_order(order_id))
    }

    /// Top-of-book snapshot for `symbol_id`; zero-filled when no book
    /// exists for the symbol yet.
    pub fn market_data(&self, symbol_id: SymbolId) -> MarketDataSnapshot {
        match self.get(symbol_id) {
            Some(book) => book.market_data(),
            None => MarketDataSnapshot::empty(symbol_id),
        }
    }

    /// Up to `depth` best bid levels for `symbol_id`; empty when the
    /// symbol is unknown.
    pub fn bid_levels(&self, symbol_id: SymbolId, depth: usize) -> Vec<(Price, Quantity)> {
        self.get(symbol_id)
            .map(|book| book.bid_levels(depth))
            .unwrap_or_default()
    }

    /// Up to `depth` best ask levels for `symbol_id`; empty when the
    /// symbol is unknown.
    pub fn ask_levels(&self, symbol_id: SymbolId, depth: usize) -> Vec<(Price, Quantity)> {
        self.get(symbol_id)
            .map(|book| book.ask_levels(depth))
            .unwrap_or_default()
    }

    /// The symbols that currently have a book.
    pub fn symbols(&self) -> Vec<SymbolId> {
        self.books.iter().map(|entry| *entry.key()).collect()
    }

    /// Whether a book exists for `symbol_id`.
    pub fn contains(&self, symbol_id: SymbolId) -> bool {
        self.books.contains_key(&symbol_id)
    }

    /// Number of materialized books.
    pub fn book_count(&self) -> usize {
        self.books.len()
    }

    /// Removes a book from the registry, returning it if present.
    pub fn remove(&self, symbol_id: SymbolId) -> Option<Arc<OrderBook>> {
        let removed = self.books.remove(&symbol_id).map(|(_, book)| book);
        if removed.is_some() {
            info!(symbol_id, "removed order book");
        }
        removed
    }
}

impl Default for BookRegistry {
    fn default() -> Self {
        Self::new()
    }
}
