//! Position sizing policies.

use serde::{Deserialize, Serialize};

/// How many units to buy when a signal fires.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SizingPolicy {
    /// A constant number of units per trade.
    FixedUnits(f64),
    /// Risk a fraction of current equity per trade: the dollar risk is
    /// `equity * fraction`, and quantity is that risk divided by the
    /// per-unit stop distance.
    RiskFraction(f64),
}

impl Default for SizingPolicy {
    fn default() -> Self {
        SizingPolicy::FixedUnits(1.0)
    }
}

impl SizingPolicy {
    /// Quantity for an entry at `entry` with a stop at `stop`.
    ///
    /// Returns 0.0 for zero-width or inverted stops under risk sizing; the
    /// simulator treats a non-positive quantity as "do not trade".
    pub fn quantity(&self, equity: f64, entry: f64, stop: f64) -> f64 {
        match *self {
            SizingPolicy::FixedUnits(units) => units,
            SizingPolicy::RiskFraction(fraction) => {
                let stop_distance = entry - stop;
                if stop_distance <= 0.0 {
                    return 0.0;
                }
                let quantity = equity * fraction / stop_distance;
                if quantity.is_finite() {
                    quantity
                } else {
                    0.0
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_units_ignores_levels() {
        let policy = SizingPolicy::FixedUnits(3.0);
        assert_eq!(policy.quantity(10_000.0, 100.0, 99.0), 3.0);
        assert_eq!(policy.quantity(10_000.0, 100.0, 100.0), 3.0);
    }

    #[test]
    fn risk_fraction_scales_with_stop_distance() {
        let policy = SizingPolicy::RiskFraction(0.01);
        // Risk $100 with a $2 stop distance: 50 units.
        assert_eq!(policy.quantity(10_000.0, 100.0, 98.0), 50.0);
        // Tighter stop, larger size.
        assert_eq!(policy.quantity(10_000.0, 100.0, 99.0), 100.0);
    }

    #[test]
    fn zero_width_stop_sizes_to_zero() {
        let policy = SizingPolicy::RiskFraction(0.05);
        assert_eq!(policy.quantity(10_000.0, 100.0, 100.0), 0.0);
        assert_eq!(policy.quantity(10_000.0, 100.0, 101.0), 0.0);
    }

    #[test]
    fn default_is_one_unit() {
        assert_eq!(SizingPolicy::default().quantity(5_000.0, 50.0, 49.0), 1.0);
    }
}
