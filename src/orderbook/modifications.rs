//! Order cancellation and modification.

use super::book::OrderBook;
use crate::pricelevel::{Order, OrderId, OrderStatus, Price, Quantity};
use tracing::trace;

impl OrderBook {
    /// Cancels a resting order by id.
    ///
    /// Returns `false` when the id is unknown or the order is already
    /// terminal; cancelling twice is therefore idempotent and mutates
    /// nothing. On success the order becomes `Cancelled`, it is removed
    /// from its price level (a level emptied by the removal is dropped
    /// from the ladder), and one market data snapshot is emitted.
    pub fn cancel_order(&self, order_id: OrderId) -> bool {
        // Unknown and terminal ids fail without touching the ladder.
        match self.orders.get(&order_id) {
            Some(order) if !order.status.is_terminal() => {}
            _ => return false,
        }

        let snapshot = {
            let mut ladder = self.ladder.write();

            // Re-read the order under the book lock: a concurrent fill,
            // cancel or modify may have changed its state, or moved it to
            // another price level, since the lookup above.
            let (side, price, remaining) = {
                let Some(mut order) = self.orders.get_mut(&order_id) else {
                    return false;
                };
                if order.status.is_terminal() {
                    return false;
                }
                order.status = OrderStatus::Cancelled;
                (order.side, order.price, order.remaining_quantity())
            };

            // A partially filled market residual has no resting presence;
            // removal from an absent level is a silent no-op.
            let book_side = ladder.side_mut(side);
            if let Some(level) = book_side.get_mut(&price) {
                level.remove(order_id, remaining);
                if level.is_empty() {
                    book_side.remove(&price);
                }
            }

            self.snapshot_with_ladder(&ladder)
        };

        trace!(order_id, symbol_id = self.symbol_id(), "cancelled order");
        self.notify_market_data(&snapshot);
        true
    }

    /// Modifies a resting order's quantity and optionally its price.
    ///
    /// Semantically a cancel followed by an add: the order keeps its id
    /// but is re-timestamped and re-queued at the tail of its (possibly
    /// new) price level, so it surrenders its time priority. `None` for
    /// `new_price` keeps the current price.
    ///
    /// Returns `false` when the id is unknown or terminal, when
    /// `new_quantity` is zero, or when the replacement is rejected on
    /// re-entry (a market residual re-entering an empty book).
    pub fn modify_order(
        &self,
        order_id: OrderId,
        new_quantity: Quantity,
        new_price: Option<Price>,
    ) -> bool {
        if new_quantity == 0 {
            return false;
        }

        let (symbol_id, side, order_type, price, stop_price) = match self.orders.get(&order_id) {
            Some(order) if !order.status.is_terminal() => (
                order.symbol_id,
                order.side,
                order.order_type,
                order.price,
                order.stop_price,
            ),
            _ => return false,
        };

        if !self.cancel_order(order_id) {
            return false;
        }

        let replacement = Order::with_stop_price(
            order_id,
            symbol_id,
            side,
            order_type,
            new_quantity,
            new_price.unwrap_or(price),
            stop_price,
        );
        trace!(
            order_id,
            new_quantity,
            price = replacement.price,
            "re-entering modified order"
        );

        match self.add_order(replacement) {
            Ok(order) => order.status != OrderStatus::Rejected,
            Err(_) => false,
        }
    }
}
