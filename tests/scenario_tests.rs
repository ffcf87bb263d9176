//! End-to-end venue scenarios driven through the simulator facade.

use matchbook::{OrderStatus, OrderType, Side, Simulator, Trade};
use parking_lot::Mutex;
use std::sync::Arc;

const SYMBOL: u32 = 100;

fn recording_simulator() -> (Simulator, Arc<Mutex<Vec<Trade>>>) {
    let simulator = Simulator::new();
    let trades = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&trades);
    simulator.register_trade_listener(
        SYMBOL,
        Arc::new(move |trade: &Trade| {
            sink.lock().push(*trade);
        }),
    );
    (simulator, trades)
}

#[test]
fn test_full_cross() {
    let (simulator, trades) = recording_simulator();

    let sell = simulator.submit_order(SYMBOL, Side::Sell, OrderType::Limit, 1000, 5000);
    let buy = simulator.submit_order(SYMBOL, Side::Buy, OrderType::Limit, 1000, 5000);
    assert_eq!((sell, buy), (1, 2));

    {
        let trades = trades.lock();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, 1000);
        assert_eq!(trades[0].price, 5000);
        assert_eq!(trades[0].buy_order_id, buy);
        assert_eq!(trades[0].sell_order_id, sell);
    }

    assert_eq!(simulator.get_order(sell).unwrap().status, OrderStatus::Filled);
    assert_eq!(simulator.get_order(buy).unwrap().status, OrderStatus::Filled);

    let snapshot = simulator.market_data(SYMBOL);
    assert_eq!(snapshot.best_bid(), None);
    assert_eq!(snapshot.best_ask(), None);

    let metrics = simulator.performance_metrics();
    assert_eq!(metrics.total_volume, 1000);
    assert_eq!(metrics.trade_count, 1);
    assert_eq!(metrics.orders_processed, 2);
    assert!(metrics.average_latency_ns > 0.0);
}

#[test]
fn test_partial_fill() {
    let (simulator, trades) = recording_simulator();

    let sell = simulator.submit_order(SYMBOL, Side::Sell, OrderType::Limit, 5000, 5000);
    let buy = simulator.submit_order(SYMBOL, Side::Buy, OrderType::Limit, 2000, 5000);

    {
        let trades = trades.lock();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].quantity, 2000);
        assert_eq!(trades[0].price, 5000);
    }

    assert_eq!(simulator.get_order(buy).unwrap().status, OrderStatus::Filled);
    let resting = simulator.get_order(sell).unwrap();
    assert_eq!(resting.status, OrderStatus::PartiallyFilled);
    assert_eq!(resting.remaining_quantity(), 3000);

    assert_eq!(simulator.ask_levels(SYMBOL, 5), vec![(5000, 3000)]);
    assert!(simulator.bid_levels(SYMBOL, 5).is_empty());
}

#[test]
fn test_price_priority() {
    let simulator = Simulator::new();

    let far = simulator.submit_order(SYMBOL, Side::Sell, OrderType::Limit, 1000, 5100);
    let best = simulator.submit_order(SYMBOL, Side::Sell, OrderType::Limit, 1000, 5000);
    let farthest = simulator.submit_order(SYMBOL, Side::Sell, OrderType::Limit, 1000, 5200);
    let taker = simulator.submit_order(SYMBOL, Side::Buy, OrderType::Market, 1000, 0);

    assert_eq!(simulator.get_order(taker).unwrap().status, OrderStatus::Filled);
    assert_eq!(simulator.get_order(best).unwrap().status, OrderStatus::Filled);
    assert_eq!(simulator.get_order(far).unwrap().status, OrderStatus::New);
    assert_eq!(
        simulator.get_order(farthest).unwrap().status,
        OrderStatus::New
    );
    assert_eq!(
        simulator.ask_levels(SYMBOL, 5),
        vec![(5100, 1000), (5200, 1000)]
    );
}

#[test]
fn test_time_priority() {
    let (simulator, trades) = recording_simulator();

    let first = simulator.submit_order(SYMBOL, Side::Buy, OrderType::Limit, 1000, 5000);
    let second = simulator.submit_order(SYMBOL, Side::Buy, OrderType::Limit, 1000, 5000);
    let taker = simulator.submit_order(SYMBOL, Side::Sell, OrderType::Limit, 1500, 5000);

    {
        let trades = trades.lock();
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].buy_order_id, first);
        assert_eq!(trades[0].quantity, 1000);
        assert_eq!(trades[1].buy_order_id, second);
        assert_eq!(trades[1].quantity, 500);
    }

    assert_eq!(simulator.get_order(first).unwrap().status, OrderStatus::Filled);
    let queued = simulator.get_order(second).unwrap();
    assert_eq!(queued.status, OrderStatus::PartiallyFilled);
    assert_eq!(queued.remaining_quantity(), 500);
    assert_eq!(simulator.get_order(taker).unwrap().status, OrderStatus::Filled);
}

#[test]
fn test_market_order_without_liquidity() {
    let (simulator, trades) = recording_simulator();

    let taker = simulator.submit_order(SYMBOL, Side::Buy, OrderType::Market, 1000, 0);

    assert_eq!(
        simulator.get_order(taker).unwrap().status,
        OrderStatus::Rejected
    );
    assert!(trades.lock().is_empty());
    assert!(simulator.bid_levels(SYMBOL, 5).is_empty());
    assert!(simulator.ask_levels(SYMBOL, 5).is_empty());
    assert_eq!(simulator.performance_metrics().trade_count, 0);
}

#[test]
fn test_cancel_while_resting() {
    let simulator = Simulator::new();

    let order = simulator.submit_order(SYMBOL, Side::Buy, OrderType::Limit, 1000, 4990);
    assert!(simulator.cancel_order(order));
    assert_eq!(
        simulator.get_order(order).unwrap().status,
        OrderStatus::Cancelled
    );
    assert!(!simulator.cancel_order(order));
    assert!(simulator.bid_levels(SYMBOL, 5).is_empty());
}

#[test]
fn test_order_ids_are_monotonic_from_one_across_symbols() {
    let simulator = Simulator::new();

    let a = simulator.submit_order(1, Side::Buy, OrderType::Limit, 100, 5000);
    let b = simulator.submit_order(2, Side::Sell, OrderType::Limit, 100, 6000);
    let c = simulator.submit_order(1, Side::Buy, OrderType::Limit, 100, 4990);

    assert_eq!((a, b, c), (1, 2, 3));
    assert_eq!(simulator.registry().book_count(), 2);
}

#[test]
fn test_cross_symbol_cancel_by_id_only() {
    let simulator = Simulator::new();

    let first = simulator.submit_order(1, Side::Buy, OrderType::Limit, 100, 5000);
    let second = simulator.submit_order(2, Side::Buy, OrderType::Limit, 100, 6000);

    assert!(simulator.cancel_order(second));
    assert!(simulator.bid_levels(2, 5).is_empty());
    assert_eq!(simulator.bid_levels(1, 5), vec![(5000, 100)]);
    assert!(simulator.cancel_order(first));
}

#[test]
fn test_modify_via_facade() {
    let simulator = Simulator::new();

    let order = simulator.submit_order(SYMBOL, Side::Buy, OrderType::Limit, 1000, 4990);
    assert!(simulator.modify_order(order, 500, Some(4980)));
    assert_eq!(simulator.bid_levels(SYMBOL, 5), vec![(4980, 500)]);
    assert!(!simulator.modify_order(9999, 500, None));
}

#[test]
fn test_stop_order_behaves_as_limit_through_facade() {
    let simulator = Simulator::new();

    simulator.submit_order(SYMBOL, Side::Sell, OrderType::Limit, 1000, 5000);
    let stop = simulator.submit_order_with_stop(SYMBOL, Side::Buy, OrderType::Stop, 1000, 5000, 4900);

    let order = simulator.get_order(stop).unwrap();
    assert_eq!(order.status, OrderStatus::Filled);
    assert_eq!(order.stop_price, 4900);
}

#[test]
fn test_unknown_symbol_queries_are_empty() {
    let simulator = Simulator::new();

    let snapshot = simulator.market_data(77);
    assert_eq!(snapshot.symbol_id, 77);
    assert_eq!(snapshot.volume, 0);
    assert!(simulator.bid_levels(77, 10).is_empty());
    assert!(simulator.ask_levels(77, 10).is_empty());
}

#[test]
fn test_metrics_aggregate_across_symbols() {
    let simulator = Simulator::new();

    simulator.submit_order(1, Side::Sell, OrderType::Limit, 100, 5000);
    simulator.submit_order(1, Side::Buy, OrderType::Limit, 100, 5000);
    simulator.submit_order(2, Side::Sell, OrderType::Limit, 200, 6000);
    simulator.submit_order(2, Side::Buy, OrderType::Limit, 200, 6000);

    let metrics = simulator.performance_metrics();
    assert_eq!(metrics.orders_processed, 4);
    assert_eq!(metrics.trade_count, 2);
    assert_eq!(metrics.total_volume, 300);
}
