//! Confluence strategy with data-derived lookback windows.
//!
//! A fixed lookback means different things on 1-minute and daily series.
//! This variant derives its windows from the calendar span of the data so
//! the strategy's effective memory horizon stays roughly constant in
//! calendar time regardless of bar frequency.

use crate::domain::{span_days, Bar, TradeSignal};

use super::{ConfluenceParams, ConfluenceStrategy, Strategy};

/// Trend window: a third of the span, clamped to [20, 200] bars.
const TREND_DIVISOR: i64 = 3;
const TREND_FLOOR: usize = 20;
const TREND_CEILING: usize = 200;

/// Momentum window: a twentieth of the span, clamped to [7, 50] bars.
const MOMENTUM_DIVISOR: i64 = 20;
const MOMENTUM_FLOOR: usize = 7;
const MOMENTUM_CEILING: usize = 50;

/// Derive (sma_period, rsi_period) from the series' calendar span.
pub fn dynamic_periods(bars: &[Bar]) -> (usize, usize) {
    let days = span_days(bars).max(0);
    let sma = ((days / TREND_DIVISOR) as usize).clamp(TREND_FLOOR, TREND_CEILING);
    let rsi = ((days / MOMENTUM_DIVISOR) as usize).clamp(MOMENTUM_FLOOR, MOMENTUM_CEILING);
    (sma, rsi)
}

/// Confluence strategy whose periods come from the data's span.
///
/// The periods are derived on the first signal query and cached for the
/// lifetime of the instance, like the indicator arrays themselves.
#[derive(Debug, Clone)]
pub struct AdaptiveConfluenceStrategy {
    rsi_oversold: f64,
    risk_reward: f64,
    stop_fraction: f64,
    inner: Option<ConfluenceStrategy>,
}

impl AdaptiveConfluenceStrategy {
    pub fn new(rsi_oversold: f64, risk_reward: f64, stop_fraction: f64) -> Self {
        Self {
            rsi_oversold,
            risk_reward,
            stop_fraction,
            inner: None,
        }
    }

    /// The derived parameters, if a series has been seen yet.
    pub fn derived_params(&self) -> Option<&ConfluenceParams> {
        self.inner.as_ref().map(|s| s.params())
    }
}

impl Default for AdaptiveConfluenceStrategy {
    fn default() -> Self {
        let base = ConfluenceParams::default();
        Self::new(base.rsi_oversold, base.risk_reward, base.stop_fraction)
    }
}

impl Strategy for AdaptiveConfluenceStrategy {
    fn name(&self) -> &str {
        "adaptive_confluence"
    }

    fn generate_signal(&mut self, bars: &[Bar], index: usize) -> TradeSignal {
        if self.inner.is_none() {
            let (sma_period, rsi_period) = dynamic_periods(bars);
            self.inner = Some(ConfluenceStrategy::new(ConfluenceParams {
                sma_period,
                rsi_period,
                rsi_oversold: self.rsi_oversold,
                risk_reward: self.risk_reward,
                stop_fraction: self.stop_fraction,
            }));
        }
        self.inner.as_mut().unwrap().generate_signal(bars, index)
    }
}
