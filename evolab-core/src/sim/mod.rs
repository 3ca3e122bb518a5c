//! Backtesting simulator: single-position bar replay.

pub mod engine;
pub mod sizer;

pub use engine::{run_backtest, BacktestReport, SimConfig};
pub use sizer::SizingPolicy;
