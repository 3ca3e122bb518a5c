//! Performance metrics: pure functions over equity curves and trade lists.
//!
//! Shared by the simulator's diagnostics and the optimizer's fitness
//! evaluation. Every function returns a finite value for any input; empty
//! or degenerate curves map to 0.0, never to NaN or a panic.

use crate::domain::TradeRecord;

/// Total return as a fraction of the initial equity.
pub fn total_return(equity_curve: &[f64]) -> f64 {
    if equity_curve.len() < 2 {
        return 0.0;
    }
    let initial = equity_curve[0];
    if initial <= 0.0 {
        return 0.0;
    }
    (equity_curve[equity_curve.len() - 1] - initial) / initial
}

/// Simplified Sharpe ratio: mean over standard deviation of per-bar returns.
///
/// Not annualized; bar frequency is unknown to the engine. Zero when the
/// curve is too short or has zero variance.
pub fn sharpe_ratio(equity_curve: &[f64]) -> f64 {
    let returns = bar_returns(equity_curve);
    if returns.is_empty() {
        return 0.0;
    }
    let mean = mean(&returns);
    let std = std_dev(&returns);
    if std > 0.0 {
        mean / std
    } else {
        0.0
    }
}

/// Maximum peak-to-trough decline as a positive fraction of the peak.
pub fn max_drawdown(equity_curve: &[f64]) -> f64 {
    let mut peak = match equity_curve.first() {
        Some(&first) => first,
        None => return 0.0,
    };
    let mut max_dd = 0.0_f64;
    for &equity in equity_curve {
        if equity > peak {
            peak = equity;
        }
        if peak > 0.0 {
            let dd = (peak - equity) / peak;
            if dd > max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

/// Fraction of closed trades with positive realized PnL.
pub fn win_rate(trades: &[TradeRecord]) -> f64 {
    if trades.is_empty() {
        return 0.0;
    }
    let winners = trades.iter().filter(|t| t.is_winner()).count();
    winners as f64 / trades.len() as f64
}

/// Gross profits over gross losses.
///
/// With no losses: 1000.0 if there were profits, else 0.0. The large
/// stand-in keeps the ratio finite for all-winner runs while still ranking
/// them above any mixed run.
pub fn profit_factor(trades: &[TradeRecord]) -> f64 {
    let gross_profit: f64 = trades.iter().filter(|t| t.pnl > 0.0).map(|t| t.pnl).sum();
    let gross_loss: f64 = trades.iter().filter(|t| t.pnl < 0.0).map(|t| -t.pnl).sum();
    if gross_loss > 0.0 {
        gross_profit / gross_loss
    } else if gross_profit > 0.0 {
        1000.0
    } else {
        0.0
    }
}

/// Total return over maximum drawdown; zero when there was no drawdown.
pub fn calmar_ratio(equity_curve: &[f64]) -> f64 {
    let dd = max_drawdown(equity_curve);
    if dd > 0.0 {
        total_return(equity_curve) / dd
    } else {
        0.0
    }
}

/// Per-bar fractional equity changes.
pub fn bar_returns(equity_curve: &[f64]) -> Vec<f64> {
    if equity_curve.len() < 2 {
        return Vec::new();
    }
    equity_curve
        .windows(2)
        .map(|w| if w[0] > 0.0 { (w[1] - w[0]) / w[0] } else { 0.0 })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
