//! Relative strength oscillator over trailing close-to-close changes.
//!
//! Windowed average gains vs. average losses, bounded in [0, 100].
//! Neutral midpoint 50.0 when there is not enough history or when total
//! movement over the window is zero. A 1e-10 loss floor replaces a zero
//! denominator so an all-gain window maps to a value just under 100.

use crate::domain::Bar;

/// Loss floor substituted when the window contains no losses.
const LOSS_EPSILON: f64 = 1e-10;

/// Oscillator value over the `period` changes ending at `end_index`.
pub fn rsi(bars: &[Bar], end_index: usize, period: usize) -> f64 {
    if period == 0 || end_index >= bars.len() || end_index < period {
        return 50.0;
    }
    let mut gain = 0.0;
    let mut loss = 0.0;
    for i in end_index + 1 - period..=end_index {
        if i == 0 {
            continue;
        }
        let change = bars[i].close - bars[i - 1].close;
        if change > 0.0 {
            gain += change;
        } else {
            loss -= change;
        }
    }
    if gain + loss == 0.0 {
        return 50.0;
    }
    let rs = gain / if loss == 0.0 { LOSS_EPSILON } else { loss };
    100.0 - 100.0 / (1.0 + rs)
}

/// Full oscillator series via direct windowed computation per index.
///
/// Warm-up positions (index < period) carry the 50.0 sentinel, matching
/// the point-wise function exactly.
pub fn rsi_series(bars: &[Bar], period: usize) -> Vec<f64> {
    (0..bars.len()).map(|i| rsi(bars, i, period)).collect()
}
