//! Trade signals emitted by strategies.

use serde::{Deserialize, Serialize};

/// Directional intent of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SignalKind {
    None,
    Buy,
    Sell,
}

/// Per-bar output of a strategy.
///
/// `bar_index` always equals the index the strategy was queried at.
/// `reason` is diagnostic metadata for logs and drill-down; the simulator
/// never branches on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeSignal {
    pub kind: SignalKind,
    pub bar_index: usize,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub reason: String,
}

impl TradeSignal {
    /// A no-action signal at `bar_index`.
    pub fn none(bar_index: usize, reason: impl Into<String>) -> Self {
        Self {
            kind: SignalKind::None,
            bar_index,
            stop_loss: 0.0,
            take_profit: 0.0,
            reason: reason.into(),
        }
    }

    /// A buy signal with bracket levels.
    pub fn buy(bar_index: usize, stop_loss: f64, take_profit: f64, reason: impl Into<String>) -> Self {
        Self {
            kind: SignalKind::Buy,
            bar_index,
            stop_loss,
            take_profit,
            reason: reason.into(),
        }
    }

    pub fn is_buy(&self) -> bool {
        self.kind == SignalKind::Buy
    }
}
