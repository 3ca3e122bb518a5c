//! Evolab Core: the simulation half of the strategy-evolution engine.
//!
//! This crate contains:
//! - Domain types (bars, signals, positions, trade records)
//! - The indicator engine with point-wise and batch computation
//! - The strategy abstraction and its fixed, adaptive, and precomputed
//!   variants
//! - The bar-by-bar single-position simulator
//! - Pure performance-metric functions shared with the optimizer
//!
//! The gene-driven strategy and the genetic optimizer live in
//! `evolab-evolve`, which builds on this crate.

pub mod domain;
pub mod indicators;
pub mod metrics;
pub mod sim;
pub mod strategy;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: types shared across evaluation workers are
    /// Send + Sync. Parallel per-gene fitness evaluation hands out the bar
    /// series by reference and moves reports between threads.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::TradeSignal>();
        require_sync::<domain::TradeSignal>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();

        require_send::<indicators::IndicatorBatch>();
        require_sync::<indicators::IndicatorBatch>();
        require_send::<indicators::IndicatorKind>();
        require_sync::<indicators::IndicatorKind>();

        require_send::<strategy::ConfluenceStrategy>();
        require_sync::<strategy::ConfluenceStrategy>();
        require_send::<strategy::AdaptiveConfluenceStrategy>();
        require_sync::<strategy::AdaptiveConfluenceStrategy>();
        require_send::<strategy::PrecomputedStrategy>();
        require_sync::<strategy::PrecomputedStrategy>();
        require_send::<strategy::SignalTable>();
        require_sync::<strategy::SignalTable>();

        require_send::<sim::SimConfig>();
        require_sync::<sim::SimConfig>();
        require_send::<sim::BacktestReport>();
        require_sync::<sim::BacktestReport>();
    }
}
