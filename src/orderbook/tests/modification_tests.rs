//! Cancellation and modification semantics.

use super::test_helpers::*;
use crate::orderbook::book::OrderBook;
use crate::pricelevel::{OrderStatus, Side};

#[test]
fn test_cancel_resting_order() {
    let book = OrderBook::new(SYMBOL);

    limit(&book, 1, Side::Buy, 1000, 4990);
    assert!(book.cancel_order(1));

    assert_eq!(status_of(&book, 1), OrderStatus::Cancelled);
    assert!(book.bid_levels(5).is_empty());
}

#[test]
fn test_cancel_is_idempotent() {
    let book = OrderBook::new(SYMBOL);

    limit(&book, 1, Side::Buy, 1000, 4990);
    assert!(book.cancel_order(1));
    assert!(!book.cancel_order(1));
    assert_eq!(status_of(&book, 1), OrderStatus::Cancelled);
}

#[test]
fn test_cancel_unknown_id_returns_false() {
    let book = OrderBook::new(SYMBOL);
    assert!(!book.cancel_order(42));
}

#[test]
fn test_cancel_filled_order_returns_false() {
    let book = OrderBook::new(SYMBOL);

    limit(&book, 1, Side::Sell, 1000, 5000);
    limit(&book, 2, Side::Buy, 1000, 5000);

    assert!(!book.cancel_order(1));
    assert_eq!(status_of(&book, 1), OrderStatus::Filled);
}

#[test]
fn test_cancel_keeps_other_orders_at_level() {
    let book = OrderBook::new(SYMBOL);

    limit(&book, 1, Side::Buy, 1000, 4990);
    limit(&book, 2, Side::Buy, 500, 4990);
    assert!(book.cancel_order(1));

    assert_eq!(book.bid_levels(5), vec![(4990, 500)]);
    // Order 2 inherits the head of the queue.
    limit(&book, 3, Side::Sell, 500, 4990);
    assert_eq!(status_of(&book, 2), OrderStatus::Filled);
}

#[test]
fn test_cancel_partially_filled_market_residual() {
    let book = OrderBook::new(SYMBOL);

    limit(&book, 1, Side::Sell, 400, 5000);
    market(&book, 2, Side::Buy, 1000);
    assert_eq!(status_of(&book, 2), OrderStatus::PartiallyFilled);

    // Nothing rests for the residual, but the cancel still lands.
    assert!(book.cancel_order(2));
    assert_eq!(status_of(&book, 2), OrderStatus::Cancelled);
}

#[test]
fn test_cancel_emits_market_data() {
    use parking_lot::Mutex;
    use std::sync::Arc;

    let book = OrderBook::new(SYMBOL);
    let snapshots = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&snapshots);
    book.register_market_data_listener(Arc::new(move |snapshot| {
        sink.lock().push(*snapshot);
    }));

    limit(&book, 1, Side::Buy, 1000, 4990);
    book.cancel_order(1);

    let snapshots = snapshots.lock();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[1].best_bid(), None);
}

#[test]
fn test_modify_quantity_keeps_price() {
    let book = OrderBook::new(SYMBOL);

    limit(&book, 1, Side::Buy, 1000, 4990);
    assert!(book.modify_order(1, 600, None));

    assert_eq!(book.bid_levels(5), vec![(4990, 600)]);
    let order = book.get_order(1).unwrap();
    assert_eq!(order.quantity, 600);
    assert_eq!(order.status, OrderStatus::New);
}

#[test]
fn test_modify_price_moves_level() {
    let book = OrderBook::new(SYMBOL);

    limit(&book, 1, Side::Buy, 1000, 4990);
    assert!(book.modify_order(1, 1000, Some(4980)));

    assert_eq!(book.bid_levels(5), vec![(4980, 1000)]);
}

#[test]
fn test_modify_surrenders_time_priority() {
    let (book, trades) = book_with_recorder();

    limit(&book, 1, Side::Buy, 1000, 5000);
    limit(&book, 2, Side::Buy, 1000, 5000);
    // Order 1 was first in; growing it sends it to the back of the queue.
    assert!(book.modify_order(1, 2000, None));

    limit(&book, 3, Side::Sell, 1000, 5000);
    assert_eq!(trades.lock()[0].buy_order_id, 2);
    assert_eq!(status_of(&book, 2), OrderStatus::Filled);
    assert_eq!(status_of(&book, 1), OrderStatus::New);
}

#[test]
fn test_modify_can_cross_immediately() {
    let book = OrderBook::new(SYMBOL);

    limit(&book, 1, Side::Sell, 500, 5000);
    limit(&book, 2, Side::Buy, 500, 4980);
    assert!(book.modify_order(2, 500, Some(5000)));

    assert_eq!(status_of(&book, 1), OrderStatus::Filled);
    assert_eq!(status_of(&book, 2), OrderStatus::Filled);
    assert_eq!(book.trade_count(), 1);
}

#[test]
fn test_modify_unknown_or_terminal_returns_false() {
    let book = OrderBook::new(SYMBOL);

    assert!(!book.modify_order(42, 100, None));

    limit(&book, 1, Side::Buy, 1000, 4990);
    book.cancel_order(1);
    assert!(!book.modify_order(1, 100, None));
}

#[test]
fn test_modify_zero_quantity_returns_false_and_mutates_nothing() {
    let book = OrderBook::new(SYMBOL);

    limit(&book, 1, Side::Buy, 1000, 4990);
    assert!(!book.modify_order(1, 0, None));

    assert_eq!(status_of(&book, 1), OrderStatus::New);
    assert_eq!(book.bid_levels(5), vec![(4990, 1000)]);
}

#[test]
fn test_modify_keeps_the_order_id() {
    let book = OrderBook::new(SYMBOL);

    limit(&book, 1, Side::Buy, 1000, 4990);
    let before = book.get_order(1).unwrap().timestamp;
    assert!(book.modify_order(1, 500, Some(4985)));

    let order = book.get_order(1).unwrap();
    assert_eq!(order.id, 1);
    // Re-entry stamps a fresh creation time.
    assert!(order.timestamp >= before);
}
