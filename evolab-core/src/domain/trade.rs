//! Completed round-trip trade records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// How a position was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    StopLoss,
    TakeProfit,
    /// Forced liquidation at the final bar's close.
    EndOfData,
}

/// A complete round-trip trade: entry through exit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub entry_bar: usize,
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,
    pub exit_bar: usize,
    pub exit_time: NaiveDateTime,
    pub exit_price: f64,
    pub quantity: f64,
    pub pnl: f64,
    pub exit: ExitReason,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }

    /// Return as a fraction of the entry price, independent of size.
    pub fn return_pct(&self) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        (self.exit_price - self.entry_price) / self.entry_price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_trade(entry_price: f64, exit_price: f64, quantity: f64) -> TradeRecord {
        let t = NaiveDate::from_ymd_opt(2023, 2, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        TradeRecord {
            entry_bar: 0,
            entry_time: t,
            entry_price,
            exit_bar: 4,
            exit_time: t,
            exit_price,
            quantity,
            pnl: (exit_price - entry_price) * quantity,
            exit: ExitReason::TakeProfit,
        }
    }

    #[test]
    fn winner_has_positive_pnl() {
        assert!(make_trade(100.0, 103.0, 1.0).is_winner());
        assert!(!make_trade(100.0, 99.0, 1.0).is_winner());
        assert!(!make_trade(100.0, 100.0, 1.0).is_winner());
    }

    #[test]
    fn return_pct_ignores_size() {
        let small = make_trade(100.0, 105.0, 1.0);
        let large = make_trade(100.0, 105.0, 40.0);
        assert_eq!(small.return_pct(), large.return_pct());
        assert!((small.return_pct() - 0.05).abs() < 1e-12);
    }
}
