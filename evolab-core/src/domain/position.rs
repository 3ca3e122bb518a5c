//! Open position state, internal to the simulator.

use chrono::NaiveDateTime;

/// A long position currently held by the simulator.
///
/// Exists only between entry and exit; the simulator destroys it when the
/// stop or target is hit, or on forced liquidation at the end of the series.
#[derive(Debug, Clone)]
pub struct OpenPosition {
    pub entry_bar: usize,
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub quantity: f64,
}

impl OpenPosition {
    /// Realized PnL for an exit at `exit_price`.
    pub fn pnl_at(&self, exit_price: f64) -> f64 {
        (exit_price - self.entry_price) * self.quantity
    }
}
