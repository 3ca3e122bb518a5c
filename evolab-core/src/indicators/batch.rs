//! Batch computation of the trend and momentum indicators.
//!
//! One call produces the full moving-average and oscillator arrays for a
//! series, using the O(n) sliding-window SMA and the windowed oscillator.
//! Warm-up positions carry the same sentinels as the point-wise functions,
//! so batch and point-wise results agree at every index. Strategies that
//! evaluate every bar precompute a batch once instead of paying the window
//! cost per query.

use crate::domain::Bar;

use super::{rsi, sma};

/// Full-series trend and momentum arrays for one (sma, rsi) period pair.
#[derive(Debug, Clone)]
pub struct IndicatorBatch {
    pub sma: Vec<f64>,
    pub rsi: Vec<f64>,
}

impl IndicatorBatch {
    pub fn compute(bars: &[Bar], sma_period: usize, rsi_period: usize) -> Self {
        Self {
            sma: sma::sma_series(bars, sma_period),
            rsi: rsi::rsi_series(bars, rsi_period),
        }
    }

    pub fn len(&self) -> usize {
        self.sma.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sma.is_empty()
    }
}
