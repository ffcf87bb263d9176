//! Synthetic order flow: a random price/quantity walk per configured
//! symbol, driving a [`Simulator`] either as deterministic bursts or from
//! paced background threads.

use crate::pricelevel::{OrderType, Price, Quantity, Side, SymbolId};
use crate::simulator::Simulator;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::info;

/// Flow parameters for one symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// The instrument to generate flow for.
    pub symbol_id: SymbolId,
    /// Center of the price walk.
    pub base_price: Price,
    /// Prices are clamped to `base_price ± price_range`.
    pub price_range: Price,
    /// Smallest generated order quantity.
    pub min_quantity: Quantity,
    /// Largest generated order quantity.
    pub max_quantity: Quantity,
    /// Per-order relative price perturbation, e.g. 0.02 for ±2%.
    pub volatility: f64,
    /// Pacing target for background generation.
    pub orders_per_second: u32,
}

impl FlowConfig {
    /// Creates a config with moderate defaults around `base_price`.
    pub fn new(symbol_id: SymbolId, base_price: Price) -> Self {
        Self {
            symbol_id,
            base_price,
            price_range: base_price / 10,
            min_quantity: 100,
            max_quantity: 5000,
            volatility: 0.02,
            orders_per_second: 100,
        }
    }
}

/// Four symbols with distinct liquidity characters: a high-volume large
/// cap, a volatile name, a cheap high-turnover name and an expensive
/// low-volume one.
pub fn default_universe() -> Vec<FlowConfig> {
    vec![
        FlowConfig {
            symbol_id: 100,
            base_price: 5000,
            price_range: 500,
            min_quantity: 100,
            max_quantity: 5000,
            volatility: 0.02,
            orders_per_second: 100,
        },
        FlowConfig {
            symbol_id: 101,
            base_price: 3000,
            price_range: 300,
            min_quantity: 50,
            max_quantity: 3000,
            volatility: 0.03,
            orders_per_second: 50,
        },
        FlowConfig {
            symbol_id: 102,
            base_price: 150,
            price_range: 50,
            min_quantity: 1000,
            max_quantity: 10000,
            volatility: 0.01,
            orders_per_second: 200,
        },
        FlowConfig {
            symbol_id: 103,
            base_price: 25000,
            price_range: 1000,
            min_quantity: 10,
            max_quantity: 100,
            volatility: 0.015,
            orders_per_second: 25,
        },
    ]
}

/// Drives a simulator with synthetic order flow.
///
/// Flow per symbol is a price walk: 90% limit orders, 10% market orders,
/// with buy limits skewed slightly below and sell limits slightly above
/// the walking price so the book develops a realistic spread. The walk
/// follows the last generated limit price and stays inside
/// `base_price ± price_range`.
pub struct FlowGenerator {
    simulator: Arc<Simulator>,
    configs: Vec<FlowConfig>,
    seed: u64,
    running: Arc<AtomicBool>,
    orders_generated: Arc<AtomicU64>,
    handles: Vec<JoinHandle<()>>,
}

impl FlowGenerator {
    /// Creates a generator with an entropy seed.
    pub fn new(simulator: Arc<Simulator>, configs: Vec<FlowConfig>) -> Self {
        Self::with_seed(simulator, configs, rand::random())
    }

    /// Creates a generator with a fixed seed, so bursts are reproducible.
    pub fn with_seed(simulator: Arc<Simulator>, configs: Vec<FlowConfig>, seed: u64) -> Self {
        Self {
            simulator,
            configs,
            seed,
            running: Arc::new(AtomicBool::new(false)),
            orders_generated: Arc::new(AtomicU64::new(0)),
            handles: Vec::new(),
        }
    }

    /// Total orders generated so far, across bursts and background threads.
    pub fn orders_generated(&self) -> u64 {
        self.orders_generated.load(Ordering::Relaxed)
    }

    /// Synchronously generates `count` orders per configured symbol on the
    /// caller's thread. Deterministic for a fixed seed and config set.
    pub fn generate(&self, count: usize) {
        for (index, config) in self.configs.iter().enumerate() {
            let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(index as u64));
            let mut walk_price = config.base_price;
            for _ in 0..count {
                Self::step(
                    &self.simulator,
                    config,
                    &mut rng,
                    &mut walk_price,
                    &self.orders_generated,
                );
            }
        }
    }

    /// Starts one paced background thread per configured symbol.
    pub fn start(&mut self) {
        if self.running.swap(true, Ordering::SeqCst) {
            return;
        }

        for (index, config) in self.configs.iter().cloned().enumerate() {
            let simulator = Arc::clone(&self.simulator);
            let running = Arc::clone(&self.running);
            let counter = Arc::clone(&self.orders_generated);
            let seed = self.seed.wrapping_add(index as u64);

            self.handles.push(std::thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                let mut walk_price = config.base_price;
                let interval =
                    Duration::from_secs_f64(1.0 / config.orders_per_second.max(1) as f64);

                while running.load(Ordering::Relaxed) {
                    Self::step(&simulator, &config, &mut rng, &mut walk_price, &counter);
                    std::thread::sleep(interval);
                }
            }));
        }

        info!(symbols = self.configs.len(), "order flow started");
    }

    /// Stops background generation and joins the worker threads.
    pub fn stop(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
        info!(
            orders = self.orders_generated(),
            "order flow stopped"
        );
    }

    /// Generates and submits one order for `config`.
    fn step(
        simulator: &Simulator,
        config: &FlowConfig,
        rng: &mut StdRng,
        walk_price: &mut Price,
        counter: &AtomicU64,
    ) {
        let side = if rng.gen_bool(0.5) {
            Side::Buy
        } else {
            Side::Sell
        };
        let order_type = if rng.gen_bool(0.9) {
            OrderType::Limit
        } else {
            OrderType::Market
        };
        let quantity = rng.gen_range(config.min_quantity..=config.max_quantity);

        let mut price = 0;
        if order_type == OrderType::Limit {
            let drift = rng.gen_range(-config.volatility..=config.volatility);
            // Buys land slightly below the walk, sells slightly above.
            let skew = match side {
                Side::Buy => 0.999,
                Side::Sell => 1.001,
            };
            let raw = (*walk_price as f64) * (1.0 + drift) * skew;
            let floor = config.base_price.saturating_sub(config.price_range);
            let ceiling = config.base_price.saturating_add(config.price_range);
            price = (raw as Price).clamp(floor, ceiling);
        }

        simulator.submit_order(config.symbol_id, side, order_type, quantity, price);
        counter.fetch_add(1, Ordering::Relaxed);

        if order_type == OrderType::Limit {
            *walk_price = price;
        }
    }
}

impl Drop for FlowGenerator {
    fn drop(&mut self) {
        self.stop();
    }
}
