//! Core order domain types: identifiers, sides, order kinds, statuses and
//! the [`Order`] record itself.

use crate::utils::current_time_micros;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique order identifier, assigned monotonically by the simulator facade.
pub type OrderId = u64;

/// Instrument identifier.
pub type SymbolId = u32;

/// Price in integer ticks. No fractional prices.
pub type Price = u64;

/// Order or trade quantity.
pub type Quantity = u64;

/// The side of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// Bid side: willing to buy.
    Buy,
    /// Ask side: willing to sell.
    Sell,
}

impl Side {
    /// Returns the opposite side.
    #[inline]
    pub fn opposite(&self) -> Self {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

/// The kind of an order.
///
/// `Stop` orders are accepted but matched exactly like limit orders at
/// their `price`; the carried `stop_price` is never armed. True stop
/// triggering is a future extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderType {
    /// Rests at `price` when not immediately matched.
    Limit,
    /// Executes against available liquidity; any residual is rejected.
    Market,
    /// Accepted and matched as a limit order at `price`.
    Stop,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Limit => write!(f, "LIMIT"),
            OrderType::Market => write!(f, "MARKET"),
            OrderType::Stop => write!(f, "STOP"),
        }
    }
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted, no fills yet.
    New,
    /// At least one fill, remaining quantity outstanding.
    PartiallyFilled,
    /// Fully executed. Terminal.
    Filled,
    /// Cancelled by request. Terminal.
    Cancelled,
    /// Refused by the engine (zero quantity, market order without
    /// liquidity). Terminal.
    Rejected,
}

impl OrderStatus {
    /// Terminal orders are never re-entered into a book.
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Filled | OrderStatus::Cancelled | OrderStatus::Rejected
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::New => write!(f, "NEW"),
            OrderStatus::PartiallyFilled => write!(f, "PARTIALLY_FILLED"),
            OrderStatus::Filled => write!(f, "FILLED"),
            OrderStatus::Cancelled => write!(f, "CANCELLED"),
            OrderStatus::Rejected => write!(f, "REJECTED"),
        }
    }
}

/// A single order.
///
/// Orders are owned by their book's id index; price levels reference them
/// by id only. `filled_quantity` is monotonically non-decreasing and never
/// exceeds `quantity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Process-wide unique identifier.
    pub id: OrderId,
    /// Instrument this order trades.
    pub symbol_id: SymbolId,
    /// Buy or sell.
    pub side: Side,
    /// Limit, market or stop.
    pub order_type: OrderType,
    /// Originally requested size.
    pub quantity: Quantity,
    /// Limit price in ticks; 0 for market orders.
    pub price: Price,
    /// Carried for stop orders; never armed.
    pub stop_price: Price,
    /// Microseconds since epoch, assigned at creation. Defines time
    /// priority among equal-price orders.
    pub timestamp: u64,
    /// Current lifecycle state.
    pub status: OrderStatus,
    /// Executed quantity so far.
    pub filled_quantity: Quantity,
}

impl Order {
    /// Creates a new order with the current timestamp and `New` status.
    ///
    /// The price of a market order is normalized to 0; its effective match
    /// price is decided by the matching engine.
    pub fn new(
        id: OrderId,
        symbol_id: SymbolId,
        side: Side,
        order_type: OrderType,
        quantity: Quantity,
        price: Price,
    ) -> Self {
        Self::with_stop_price(id, symbol_id, side, order_type, quantity, price, 0)
    }

    /// Creates a new order carrying an explicit stop price.
    pub fn with_stop_price(
        id: OrderId,
        symbol_id: SymbolId,
        side: Side,
        order_type: OrderType,
        quantity: Quantity,
        price: Price,
        stop_price: Price,
    ) -> Self {
        let price = match order_type {
            OrderType::Market => 0,
            _ => price,
        };
        Self {
            id,
            symbol_id,
            side,
            order_type,
            quantity,
            price,
            stop_price,
            timestamp: current_time_micros(),
            status: OrderStatus::New,
            filled_quantity: 0,
        }
    }

    /// Convenience constructor for a limit order.
    pub fn limit(
        id: OrderId,
        symbol_id: SymbolId,
        side: Side,
        quantity: Quantity,
        price: Price,
    ) -> Self {
        Self::new(id, symbol_id, side, OrderType::Limit, quantity, price)
    }

    /// Convenience constructor for a market order.
    pub fn market(id: OrderId, symbol_id: SymbolId, side: Side, quantity: Quantity) -> Self {
        Self::new(id, symbol_id, side, OrderType::Market, quantity, 0)
    }

    /// Quantity still outstanding.
    #[inline]
    pub fn remaining_quantity(&self) -> Quantity {
        self.quantity - self.filled_quantity
    }

    /// True when the order is fully executed.
    #[inline]
    pub fn is_filled(&self) -> bool {
        self.filled_quantity == self.quantity
    }

    /// Records an execution of `quantity` against this order.
    ///
    /// A fill beyond the remaining quantity is a programming error in the
    /// matching engine, not a client-visible failure mode.
    #[inline]
    pub(crate) fn fill(&mut self, quantity: Quantity) {
        debug_assert!(quantity <= self.remaining_quantity());
        self.filled_quantity += quantity;
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order[{} {} {} {}@{} filled={} status={}]",
            self.id,
            self.side,
            self.order_type,
            self.quantity,
            self.price,
            self.filled_quantity,
            self.status
        )
    }
}
