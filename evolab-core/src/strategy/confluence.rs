//! Fixed-rule confluence strategy.
//!
//! Buys only when three independent conditions line up on the same bar:
//! trend (close above the moving average), momentum (oscillator under the
//! oversold threshold), and a detected gap. Absence of any one condition
//! yields no signal.

use serde::{Deserialize, Serialize};

use crate::domain::{Bar, TradeSignal};
use crate::indicators::{gap_detected, IndicatorBatch};

use super::Strategy;

/// Parameters for the confluence rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfluenceParams {
    pub sma_period: usize,
    pub rsi_period: usize,
    /// Oscillator level below which the bar counts as oversold.
    pub rsi_oversold: f64,
    /// Take-profit distance as a multiple of the stop distance.
    pub risk_reward: f64,
    /// Stop distance as a fraction of the entry close.
    pub stop_fraction: f64,
}

impl Default for ConfluenceParams {
    fn default() -> Self {
        Self {
            sma_period: 50,
            rsi_period: 14,
            rsi_oversold: 30.0,
            risk_reward: 3.0,
            stop_fraction: 0.005,
        }
    }
}

impl ConfluenceParams {
    /// Bars required before a signal can fire.
    pub fn warmup_bars(&self) -> usize {
        self.sma_period.max(self.rsi_period)
    }

    /// Bracket levels for a BUY at `entry`.
    pub fn bracket(&self, entry: f64) -> (f64, f64) {
        let stop = entry * (1.0 - self.stop_fraction);
        let target = entry + (entry - stop) * self.risk_reward;
        (stop, target)
    }
}

/// Confluence strategy with constant lookback periods.
#[derive(Debug, Clone)]
pub struct ConfluenceStrategy {
    params: ConfluenceParams,
    batch: Option<IndicatorBatch>,
}

impl ConfluenceStrategy {
    pub fn new(params: ConfluenceParams) -> Self {
        Self { params, batch: None }
    }

    pub fn params(&self) -> &ConfluenceParams {
        &self.params
    }

    fn batch(&mut self, bars: &[Bar]) -> &IndicatorBatch {
        if self.batch.as_ref().map(|b| b.len()) != Some(bars.len()) {
            self.batch = Some(IndicatorBatch::compute(
                bars,
                self.params.sma_period,
                self.params.rsi_period,
            ));
        }
        self.batch.as_ref().unwrap()
    }
}

impl Default for ConfluenceStrategy {
    fn default() -> Self {
        Self::new(ConfluenceParams::default())
    }
}

impl Strategy for ConfluenceStrategy {
    fn name(&self) -> &str {
        "confluence"
    }

    fn generate_signal(&mut self, bars: &[Bar], index: usize) -> TradeSignal {
        if index >= bars.len() || index < self.params.warmup_bars() {
            return TradeSignal::none(index, "insufficient history");
        }

        let params = self.params;
        let batch = self.batch(bars);
        let close = bars[index].close;

        let uptrend = close > batch.sma[index];
        let oversold = batch.rsi[index] < params.rsi_oversold;
        let gap = gap_detected(bars, index);

        if uptrend && oversold && gap {
            let (stop, target) = params.bracket(close);
            TradeSignal::buy(index, stop, target, "uptrend, oversold, gap")
        } else {
            TradeSignal::none(index, "no setup")
        }
    }
}
