//! Contains the core matching engine logic for the order book.
//!
//! An incoming order is matched against the opposite ladder under
//! price-time priority: best price first, FIFO within a price. Every fill
//! executes at the resting order's price, so an aggressive limit order may
//! receive price improvement versus its own limit. The entire match loop
//! runs under exclusive acquisition of the book lock; trade and market
//! data subscribers are notified only after the lock is released.

use super::book::{Ladder, OrderBook};
use super::error::OrderBookError;
use super::trade::Trade;
use crate::pricelevel::{Order, OrderStatus, OrderType, Price, Side};
use tracing::trace;

impl OrderBook {
    /// Adds an order to the book, matching it against resting liquidity.
    ///
    /// Any residual quantity of a limit (or stop, matched as limit) order
    /// rests on its own side at its limit price. Residual market quantity
    /// never rests: the order ends `PartiallyFilled` when some fills
    /// occurred and `Rejected` otherwise. Zero-quantity orders are
    /// rejected without touching the ladder.
    ///
    /// Returns a snapshot of the order in its post-matching state. One
    /// trade is delivered to subscribers per fill, in production order,
    /// followed by exactly one market data snapshot reflecting the
    /// post-operation state.
    ///
    /// # Errors
    /// [`OrderBookError::SymbolMismatch`] when the order targets another
    /// instrument, [`OrderBookError::InvalidOrderStatus`] when it is not
    /// `New`, and [`OrderBookError::DuplicateOrderId`] when an order with
    /// the same id is still live in this book.
    pub fn add_order(&self, order: Order) -> Result<Order, OrderBookError> {
        if order.symbol_id != self.symbol_id() {
            return Err(OrderBookError::SymbolMismatch {
                expected: self.symbol_id(),
                actual: order.symbol_id,
            });
        }
        if order.status != OrderStatus::New {
            return Err(OrderBookError::InvalidOrderStatus {
                order_id: order.id,
                status: order.status,
            });
        }
        if let Some(existing) = self.orders.get(&order.id) {
            if !existing.status.is_terminal() {
                return Err(OrderBookError::DuplicateOrderId(order.id));
            }
        }

        trace!(
            order_id = order.id,
            symbol_id = order.symbol_id,
            side = %order.side,
            order_type = %order.order_type,
            quantity = order.quantity,
            price = order.price,
            "adding order"
        );

        let mut order = order;
        let (trades, snapshot) = {
            let mut ladder = self.ladder.write();

            let trades = if order.quantity == 0 {
                order.status = OrderStatus::Rejected;
                Vec::new()
            } else {
                match order.order_type {
                    OrderType::Limit | OrderType::Stop => {
                        self.process_limit_order(&mut ladder, &mut order)
                    }
                    OrderType::Market => self.process_market_order(&mut ladder, &mut order),
                }
            };

            // Publish to the index before the ladder unlocks: no other
            // operation may observe a level holding an id the index lacks.
            self.orders.insert(order.id, order.clone());

            (trades, self.snapshot_with_ladder(&ladder))
        };

        for trade in &trades {
            self.notify_trade(trade);
        }
        self.notify_market_data(&snapshot);

        Ok(order)
    }

    /// Matches a limit order; any residual rests at its limit price.
    fn process_limit_order(&self, ladder: &mut Ladder, order: &mut Order) -> Vec<Trade> {
        let trades = self.match_against_book(ladder, order);

        if order.remaining_quantity() == 0 {
            order.status = OrderStatus::Filled;
        } else {
            order.status = if order.filled_quantity == 0 {
                OrderStatus::New
            } else {
                OrderStatus::PartiallyFilled
            };
            // Residual rests at the limit price, never at an improved one.
            ladder
                .side_mut(order.side)
                .entry(order.price)
                .or_default()
                .push_back(order.id, order.remaining_quantity());
        }

        trades
    }

    /// Matches a market order; residual quantity never rests.
    fn process_market_order(&self, ladder: &mut Ladder, order: &mut Order) -> Vec<Trade> {
        let trades = self.match_against_book(ladder, order);

        order.status = if order.remaining_quantity() == 0 {
            OrderStatus::Filled
        } else if order.filled_quantity > 0 {
            OrderStatus::PartiallyFilled
        } else {
            OrderStatus::Rejected
        };

        trades
    }

    /// Walks the opposite ladder from its best end, consuming head-of-queue
    /// resting orders while the taker has remaining quantity and the level
    /// price is crossable.
    fn match_against_book(&self, ladder: &mut Ladder, taker: &mut Order) -> Vec<Trade> {
        let limit = Self::effective_limit(taker);
        let mut trades = Vec::new();

        while taker.remaining_quantity() > 0 {
            // Best opposite level: lowest ask for a buy, highest bid for a sell.
            let best = match taker.side {
                Side::Buy => ladder.asks.keys().next().copied(),
                Side::Sell => ladder.bids.keys().next_back().copied(),
            };
            let Some(price) = best else { break };

            let crossable = match taker.side {
                Side::Buy => price <= limit,
                Side::Sell => price >= limit,
            };
            if !crossable {
                break;
            }

            let opposite = ladder.side_mut(taker.side.opposite());
            let Some(level) = opposite.get_mut(&price) else { break };

            while taker.remaining_quantity() > 0 {
                let Some(maker_id) = level.front() else { break };

                // Resting ids are always present in the index; a stale head
                // can only be a terminal order awaiting queue cleanup.
                let mut maker = match self.orders.get_mut(&maker_id) {
                    Some(maker) if !maker.status.is_terminal() => maker,
                    _ => {
                        level.pop_front();
                        continue;
                    }
                };

                let fill = taker.remaining_quantity().min(maker.remaining_quantity());
                maker.fill(fill);
                let maker_done = maker.is_filled();
                maker.status = if maker_done {
                    OrderStatus::Filled
                } else {
                    OrderStatus::PartiallyFilled
                };
                drop(maker);

                taker.fill(fill);
                level.reduce(fill);
                if maker_done {
                    level.pop_front();
                }

                let (buy_order_id, sell_order_id) = match taker.side {
                    Side::Buy => (taker.id, maker_id),
                    Side::Sell => (maker_id, taker.id),
                };
                let trade = self.record_trade(buy_order_id, sell_order_id, fill, price);
                trace!(
                    trade_id = trade.trade_id,
                    buy_order_id,
                    sell_order_id,
                    quantity = fill,
                    price,
                    "executed trade"
                );
                trades.push(trade);
            }

            if level.is_empty() || level.order_count() == 0 {
                opposite.remove(&price);
            }
        }

        trades
    }

    /// The effective match price of an incoming order: market orders cross
    /// every level, limit and stop orders cross up to their limit price.
    fn effective_limit(order: &Order) -> Price {
        match order.order_type {
            OrderType::Market => match order.side {
                Side::Buy => Price::MAX,
                Side::Sell => 0,
            },
            _ => order.price,
        }
    }
}
