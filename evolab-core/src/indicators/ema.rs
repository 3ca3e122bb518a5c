//! Exponential moving average.
//!
//! Seeded with the simple mean of the first `period` closes, then smoothed
//! with alpha = 2 / (period + 1). Warm-up positions carry the 0.0 sentinel.

use crate::domain::Bar;

/// Full EMA series for `period`.
pub fn ema_series(bars: &[Bar], period: usize) -> Vec<f64> {
    let n = bars.len();
    let mut result = vec![0.0; n];
    if period == 0 || n < period {
        return result;
    }

    let seed: f64 = bars.iter().take(period).map(|bar| bar.close).sum::<f64>() / period as f64;
    result[period - 1] = seed;

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut prev = seed;
    for i in period..n {
        prev = alpha * bars[i].close + (1.0 - alpha) * prev;
        result[i] = prev;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn ema_seed_is_sma() {
        let bars = make_bars(&[10.0, 12.0, 14.0, 16.0]);
        let series = ema_series(&bars, 3);
        assert_eq!(series[0], 0.0);
        assert_eq!(series[1], 0.0);
        assert_approx(series[2], 12.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_tracks_constant_series() {
        let bars = make_bars(&[50.0; 10]);
        let series = ema_series(&bars, 4);
        for &v in &series[3..] {
            assert_approx(v, 50.0, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn ema_recursion() {
        let bars = make_bars(&[10.0, 12.0, 14.0, 20.0]);
        let series = ema_series(&bars, 3);
        // alpha = 0.5; seed = 12; next = 0.5*20 + 0.5*12 = 16
        assert_approx(series[3], 16.0, DEFAULT_EPSILON);
    }

    #[test]
    fn ema_short_series_is_all_sentinel() {
        let bars = make_bars(&[10.0, 11.0]);
        assert!(ema_series(&bars, 5).iter().all(|&v| v == 0.0));
    }
}
