//! Indicator engine.
//!
//! Point-wise functions compute a single value at an end index; series
//! functions compute the full array for a period. Both sides fail soft:
//! positions without enough trailing history carry a sentinel (0.0 for
//! price-scale indicators, 50.0 for the oscillator) rather than an error,
//! and callers must treat the sentinel as "indicator undefined".
//!
//! Invariant: for every index, the series functions agree with the
//! point-wise functions within 1e-9. `batch::IndicatorBatch` relies on it.

pub mod batch;
pub mod ema;
pub mod gap;
pub mod momentum;
pub mod rsi;
pub mod sma;

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

pub use batch::IndicatorBatch;
pub use gap::{gap_detected, GAP_THRESHOLD};

/// The closed set of indicator kinds a strategy gene can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndicatorKind {
    Sma,
    Ema,
    Rsi,
    Momentum,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 4] = [
        IndicatorKind::Sma,
        IndicatorKind::Ema,
        IndicatorKind::Rsi,
        IndicatorKind::Momentum,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IndicatorKind::Sma => "sma",
            IndicatorKind::Ema => "ema",
            IndicatorKind::Rsi => "rsi",
            IndicatorKind::Momentum => "momentum",
        }
    }
}

/// Compute the full series for one indicator kind.
pub fn compute_series(kind: IndicatorKind, bars: &[Bar], period: usize) -> Vec<f64> {
    match kind {
        IndicatorKind::Sma => sma::sma_series(bars, period),
        IndicatorKind::Ema => ema::ema_series(bars, period),
        IndicatorKind::Rsi => rsi::rsi_series(bars, period),
        IndicatorKind::Momentum => momentum::momentum_series(bars, period),
    }
}

/// Create synthetic bars from close prices for testing.
///
/// Daily timestamps from 2024-01-02; open = previous close, high/low bracket
/// the open/close range by 1.0, volume constant.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-9;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_names() {
        assert_eq!(IndicatorKind::Sma.name(), "sma");
        assert_eq!(IndicatorKind::Momentum.name(), "momentum");
    }

    #[test]
    fn compute_series_lengths_match_input() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 101.0, 103.0]);
        for kind in IndicatorKind::ALL {
            assert_eq!(compute_series(kind, &bars, 3).len(), bars.len());
        }
    }
}
