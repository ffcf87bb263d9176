//! Centralized trade event routing across a registry's books.
//!
//! A router owns a [`BookRegistry`] whose lazily created books all forward
//! their fills into one channel; a processor drains the channel and logs
//! the events. Two flavors are provided, one on standard library mpsc
//! channels and one on Tokio channels.

use super::registry::BookRegistry;
use super::trade::{Trade, TradeEvent, TradeListener};
use crate::utils::current_time_micros;
use std::sync::Arc;
use tracing::{error, info};

/// Trade router using standard library mpsc channels.
pub struct TradeRouterStd {
    /// The registry whose books feed this router.
    registry: Arc<BookRegistry>,
    /// Receiver for trade events (taken when the processor starts).
    trade_receiver: Option<std::sync::mpsc::Receiver<TradeEvent>>,
}

impl TradeRouterStd {
    /// Creates a router and its backing registry.
    pub fn new() -> Self {
        let (sender, receiver) = std::sync::mpsc::channel();

        let listener: TradeListener = Arc::new(move |trade: &Trade| {
            let event = TradeEvent {
                symbol_id: trade.symbol_id,
                trade: *trade,
                received_at: current_time_micros(),
            };
            if let Err(e) = sender.send(event) {
                error!(
                    symbol_id = trade.symbol_id,
                    "failed to forward trade event: {e}"
                );
            }
        });

        Self {
            registry: Arc::new(BookRegistry::with_trade_listener(listener)),
            trade_receiver: Some(receiver),
        }
    }

    /// The registry whose books feed this router.
    pub fn registry(&self) -> &Arc<BookRegistry> {
        &self.registry
    }

    /// Starts the trade event processor in a separate thread.
    ///
    /// # Panics
    /// Panics if the processor was already started.
    pub fn start_trade_processor(&mut self) -> std::thread::JoinHandle<()> {
        let receiver = self
            .trade_receiver
            .take()
            .expect("trade processor already started");

        std::thread::spawn(move || {
            info!("trade processor started");

            while let Ok(event) = receiver.recv() {
                Self::process_trade_event(event);
            }

            info!("trade processor stopped");
        })
    }

    /// Processes a single trade event.
    fn process_trade_event(event: TradeEvent) {
        info!(
            symbol_id = event.symbol_id,
            trade_id = event.trade.trade_id,
            quantity = event.trade.quantity,
            price = event.trade.price,
            "routed trade"
        );
    }
}

impl Default for TradeRouterStd {
    fn default() -> Self {
        Self::new()
    }
}

/// Trade router using Tokio mpsc channels.
pub struct TradeRouterTokio {
    /// The registry whose books feed this router.
    registry: Arc<BookRegistry>,
    /// Receiver for trade events (taken when the processor starts).
    trade_receiver: Option<tokio::sync::mpsc::UnboundedReceiver<TradeEvent>>,
}

impl TradeRouterTokio {
    /// Creates a router and its backing registry.
    pub fn new() -> Self {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();

        let listener: TradeListener = Arc::new(move |trade: &Trade| {
            let event = TradeEvent {
                symbol_id: trade.symbol_id,
                trade: *trade,
                received_at: current_time_micros(),
            };
            if let Err(e) = sender.send(event) {
                error!(
                    symbol_id = trade.symbol_id,
                    "failed to forward trade event: {e}"
                );
            }
        });

        Self {
            registry: Arc::new(BookRegistry::with_trade_listener(listener)),
            trade_receiver: Some(receiver),
        }
    }

    /// The registry whose books feed this router.
    pub fn registry(&self) -> &Arc<BookRegistry> {
        &self.registry
    }

    /// Starts the trade event processor as an async task.
    ///
    /// # Panics
    /// Panics if the processor was already started.
    pub fn start_trade_processor(&mut self) -> tokio::task::JoinHandle<()> {
        let mut receiver = self
            .trade_receiver
            .take()
            .expect("trade processor already started");

        tokio::spawn(async move {
            info!("trade processor started");

            while let Some(event) = receiver.recv().await {
                Self::process_trade_event(event);
            }

            info!("trade processor stopped");
        })
    }

    /// Processes a single trade event.
    fn process_trade_event(event: TradeEvent) {
        info!(
            symbol_id = event.symbol_id,
            trade_id = event.trade.trade_id,
            quantity = event.trade.quantity,
            price = event.trade.price,
            "routed trade"
        );
    }
}

impl Default for TradeRouterTokio {
    fn default() -> Self {
        Self::new()
    }
}
