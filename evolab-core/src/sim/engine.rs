//! Bar-by-bar backtesting state machine.
//!
//! Two states: flat and in-position, with at most one open position at any
//! time. While flat, the bound strategy is queried each bar; while in a
//! position, only the exit levels are checked. Every opened position is
//! eventually closed, by stop, by target, or by forced liquidation at the
//! final bar. All state lives in this function's locals and the returned
//! report, so concurrent runs over the same series are safe.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::domain::{Bar, ExitReason, OpenPosition, TradeRecord};
use crate::metrics;
use crate::strategy::Strategy;

use super::sizer::SizingPolicy;

/// Configuration for one simulated run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub initial_equity: f64,
    pub sizing: SizingPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            initial_equity: 1_000.0,
            sizing: SizingPolicy::default(),
        }
    }
}

/// Everything a completed run exposes to reporting collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    initial_equity: f64,
    final_equity: f64,
    equity_curve: Vec<f64>,
    yearly_pnl: BTreeMap<i32, f64>,
    trades: Vec<TradeRecord>,
}

impl BacktestReport {
    pub fn initial_equity(&self) -> f64 {
        self.initial_equity
    }

    pub fn final_equity(&self) -> f64 {
        self.final_equity
    }

    /// One equity value per processed bar, append-only during the run.
    pub fn equity_curve(&self) -> &[f64] {
        &self.equity_curve
    }

    /// Realized PnL per calendar year, keyed by each trade's entry year.
    pub fn yearly_pnl(&self) -> &BTreeMap<i32, f64> {
        &self.yearly_pnl
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn total_trades(&self) -> usize {
        self.trades.len()
    }

    /// Fraction of closed trades with positive realized PnL.
    pub fn win_rate(&self) -> f64 {
        metrics::win_rate(&self.trades)
    }

    /// Peak-to-trough equity decline as a positive fraction of the peak.
    pub fn max_drawdown(&self) -> f64 {
        metrics::max_drawdown(&self.equity_curve)
    }

    /// Simplified Sharpe ratio over per-bar equity deltas.
    pub fn sharpe_ratio(&self) -> f64 {
        metrics::sharpe_ratio(&self.equity_curve)
    }
}

/// Replay the series against a strategy in a single deterministic pass.
///
/// Each call builds fresh state; rerunning with a fresh strategy instance
/// over the same series reproduces the same report exactly.
pub fn run_backtest(bars: &[Bar], strategy: &mut dyn Strategy, config: &SimConfig) -> BacktestReport {
    let mut equity = config.initial_equity;
    let mut equity_curve = Vec::with_capacity(bars.len());
    let mut yearly_pnl: BTreeMap<i32, f64> = BTreeMap::new();
    let mut trades: Vec<TradeRecord> = Vec::new();
    let mut position: Option<OpenPosition> = None;

    let last = bars.len().saturating_sub(1);

    for (i, bar) in bars.iter().enumerate() {
        match position.take() {
            None => {
                let signal = strategy.generate_signal(bars, i);
                if signal.is_buy() {
                    let entry = bar.close;
                    let quantity = config.sizing.quantity(equity, entry, signal.stop_loss);
                    if is_tradeable(entry, signal.stop_loss, signal.take_profit, quantity) {
                        position = Some(OpenPosition {
                            entry_bar: i,
                            entry_time: bar.timestamp,
                            entry_price: entry,
                            stop_loss: signal.stop_loss,
                            take_profit: signal.take_profit,
                            quantity,
                        });
                    }
                }
            }
            Some(pos) => {
                // Stop checked before target: when both levels fall inside
                // one bar the intrabar order of touches is unknowable, and
                // the stop branch wins. Changing this reorders every
                // historical fitness comparison.
                if bar.low <= pos.stop_loss {
                    close_position(
                        &pos, i, bar, pos.stop_loss, ExitReason::StopLoss,
                        &mut equity, &mut yearly_pnl, &mut trades,
                    );
                } else if bar.high >= pos.take_profit {
                    close_position(
                        &pos, i, bar, pos.take_profit, ExitReason::TakeProfit,
                        &mut equity, &mut yearly_pnl, &mut trades,
                    );
                } else {
                    position = Some(pos);
                }
            }
        }

        // Forced liquidation at the end of the series, applied within the
        // final iteration so the curve's last point equals final equity.
        if i == last {
            if let Some(pos) = position.take() {
                close_position(
                    &pos, i, bar, bar.close, ExitReason::EndOfData,
                    &mut equity, &mut yearly_pnl, &mut trades,
                );
            }
        }

        equity_curve.push(equity);
    }

    BacktestReport {
        initial_equity: config.initial_equity,
        final_equity: equity,
        equity_curve,
        yearly_pnl,
        trades,
    }
}

/// Degenerate signals (inverted brackets, non-finite levels, zero size)
/// are ignored rather than faulted on.
fn is_tradeable(entry: f64, stop: f64, target: f64, quantity: f64) -> bool {
    stop.is_finite()
        && target.is_finite()
        && stop < entry
        && target > entry
        && quantity.is_finite()
        && quantity > 0.0
}

#[allow(clippy::too_many_arguments)]
fn close_position(
    pos: &OpenPosition,
    exit_bar: usize,
    bar: &Bar,
    exit_price: f64,
    exit: ExitReason,
    equity: &mut f64,
    yearly_pnl: &mut BTreeMap<i32, f64>,
    trades: &mut Vec<TradeRecord>,
) {
    let pnl = pos.pnl_at(exit_price);
    *equity += pnl;
    // Bucketed by the entry year, not the exit year.
    *yearly_pnl.entry(pos.entry_time.year()).or_insert(0.0) += pnl;
    trades.push(TradeRecord {
        entry_bar: pos.entry_bar,
        entry_time: pos.entry_time,
        entry_price: pos.entry_price,
        exit_bar,
        exit_time: bar.timestamp,
        exit_price,
        quantity: pos.quantity,
        pnl,
        exit,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{SignalKind, TradeSignal};
    use crate::indicators::make_bars;
    use std::collections::HashMap;

    /// Emits scripted BUY signals at fixed indices; used to exercise the
    /// state machine independently of any indicator logic.
    struct ScriptedStrategy {
        buys: HashMap<usize, (f64, f64)>,
        queried: Vec<usize>,
    }

    impl ScriptedStrategy {
        fn new(buys: &[(usize, f64, f64)]) -> Self {
            Self {
                buys: buys.iter().map(|&(i, stop, target)| (i, (stop, target))).collect(),
                queried: Vec::new(),
            }
        }
    }

    impl Strategy for ScriptedStrategy {
        fn name(&self) -> &str {
            "scripted"
        }

        fn generate_signal(&mut self, _bars: &[Bar], index: usize) -> TradeSignal {
            self.queried.push(index);
            match self.buys.get(&index) {
                Some(&(stop, target)) => TradeSignal::buy(index, stop, target, "scripted"),
                None => TradeSignal::none(index, "scripted"),
            }
        }
    }

    #[test]
    fn empty_series_is_a_no_op() {
        let mut strategy = ScriptedStrategy::new(&[]);
        let report = run_backtest(&[], &mut strategy, &SimConfig::default());
        assert_eq!(report.total_trades(), 0);
        assert_eq!(report.final_equity(), report.initial_equity());
        assert!(report.equity_curve().is_empty());
        assert!(report.yearly_pnl().is_empty());
    }

    #[test]
    fn single_bar_series_is_a_no_op() {
        let bars = make_bars(&[100.0]);
        let mut strategy = ScriptedStrategy::new(&[]);
        let report = run_backtest(&bars, &mut strategy, &SimConfig::default());
        assert_eq!(report.total_trades(), 0);
        assert_eq!(report.equity_curve().len(), 1);
        assert_eq!(report.equity_curve()[0], 1_000.0);
    }

    #[test]
    fn curve_has_one_point_per_bar() {
        let bars = make_bars(&[100.0; 25]);
        let mut strategy = ScriptedStrategy::new(&[(3, 99.0, 106.0)]);
        let report = run_backtest(&bars, &mut strategy, &SimConfig::default());
        assert_eq!(report.equity_curve().len(), 25);
    }

    #[test]
    fn stop_hit_realizes_stop_level_exactly() {
        let mut bars = make_bars(&[100.0; 10]);
        // Entry at bar 2 close 100, stop 98, target 106. Bar 4 trades
        // through the stop; the realized price is the level, not the low.
        bars[4].low = 95.0;
        let mut strategy = ScriptedStrategy::new(&[(2, 98.0, 106.0)]);
        let report = run_backtest(&bars, &mut strategy, &SimConfig::default());

        assert_eq!(report.total_trades(), 1);
        let trade = &report.trades()[0];
        assert_eq!(trade.exit, ExitReason::StopLoss);
        assert_eq!(trade.exit_price, 98.0);
        assert_eq!(trade.exit_bar, 4);
        assert_eq!(trade.pnl, -2.0);
        assert_eq!(report.final_equity(), 998.0);
        assert_eq!(report.win_rate(), 0.0);
    }

    #[test]
    fn target_hit_realizes_target_level_exactly() {
        let mut bars = make_bars(&[100.0; 10]);
        bars[5].high = 110.0;
        let mut strategy = ScriptedStrategy::new(&[(2, 98.0, 106.0)]);
        let report = run_backtest(&bars, &mut strategy, &SimConfig::default());

        assert_eq!(report.total_trades(), 1);
        let trade = &report.trades()[0];
        assert_eq!(trade.exit, ExitReason::TakeProfit);
        assert_eq!(trade.exit_price, 106.0);
        assert_eq!(trade.pnl, 6.0);
        assert_eq!(report.win_rate(), 1.0);
    }

    #[test]
    fn stop_wins_when_both_levels_hit_in_one_bar() {
        let mut bars = make_bars(&[100.0; 8]);
        // Bar 3 spans both the stop (98) and the target (106).
        bars[3].low = 90.0;
        bars[3].high = 115.0;
        let mut strategy = ScriptedStrategy::new(&[(2, 98.0, 106.0)]);
        let report = run_backtest(&bars, &mut strategy, &SimConfig::default());

        assert_eq!(report.total_trades(), 1);
        let trade = &report.trades()[0];
        assert_eq!(trade.exit, ExitReason::StopLoss);
        assert_eq!(trade.exit_price, 98.0);
    }

    #[test]
    fn open_position_is_force_closed_at_final_close() {
        let mut bars = make_bars(&[100.0; 6]);
        bars[5].close = 103.0;
        // Wide bracket: nothing triggers before the series ends.
        let mut strategy = ScriptedStrategy::new(&[(2, 50.0, 200.0)]);
        let report = run_backtest(&bars, &mut strategy, &SimConfig::default());

        assert_eq!(report.total_trades(), 1);
        let trade = &report.trades()[0];
        assert_eq!(trade.exit, ExitReason::EndOfData);
        assert_eq!(trade.exit_price, 103.0);
        assert_eq!(trade.pnl, 3.0);
        assert_eq!(report.final_equity(), 1_003.0);
        // The curve's last point reflects the forced close.
        assert_eq!(*report.equity_curve().last().unwrap(), 1_003.0);
    }

    #[test]
    fn strategy_is_not_queried_while_in_position() {
        let mut bars = make_bars(&[100.0; 10]);
        bars[6].high = 110.0;
        let mut strategy = ScriptedStrategy::new(&[(2, 98.0, 106.0), (4, 97.0, 105.0)]);
        let report = run_backtest(&bars, &mut strategy, &SimConfig::default());

        // The bar-4 signal is never seen: the simulator was in a position.
        assert!(!strategy.queried.contains(&4));
        assert_eq!(report.total_trades(), 1);
        // Flat again after the exit at bar 6; queries resume at bar 7.
        assert!(strategy.queried.contains(&7));
    }

    #[test]
    fn degenerate_signal_is_ignored() {
        let bars = make_bars(&[100.0; 6]);
        // Stop above entry: structurally unable to trade.
        let mut strategy = ScriptedStrategy::new(&[(2, 101.0, 106.0)]);
        let report = run_backtest(&bars, &mut strategy, &SimConfig::default());
        assert_eq!(report.total_trades(), 0);
        assert_eq!(report.final_equity(), 1_000.0);
    }

    #[test]
    fn risk_sizing_scales_pnl() {
        let mut bars = make_bars(&[100.0; 8]);
        bars[4].high = 110.0;
        let config = SimConfig {
            initial_equity: 10_000.0,
            sizing: SizingPolicy::RiskFraction(0.01),
        };
        // Stop distance 2.0, risk $100: 50 units; target +6 → pnl $300.
        let mut strategy = ScriptedStrategy::new(&[(2, 98.0, 106.0)]);
        let report = run_backtest(&bars, &mut strategy, &config);

        assert_eq!(report.total_trades(), 1);
        assert_eq!(report.trades()[0].quantity, 50.0);
        assert_eq!(report.trades()[0].pnl, 300.0);
        assert_eq!(report.final_equity(), 10_300.0);
    }

    #[test]
    fn pnl_buckets_by_entry_year() {
        // 30 daily bars starting 2024-01-02: all within one year.
        let bars = make_bars(&[100.0; 30]);
        let mut strategy = ScriptedStrategy::new(&[(2, 50.0, 200.0)]);
        let report = run_backtest(&bars, &mut strategy, &SimConfig::default());
        assert_eq!(report.yearly_pnl().len(), 1);
        assert!(report.yearly_pnl().contains_key(&2024));
    }

    #[test]
    fn reruns_are_reproducible() {
        let mut bars = make_bars(&[100.0; 12]);
        bars[7].low = 90.0;
        let config = SimConfig::default();
        let first = run_backtest(&bars, &mut ScriptedStrategy::new(&[(2, 98.0, 106.0)]), &config);
        let second = run_backtest(&bars, &mut ScriptedStrategy::new(&[(2, 98.0, 106.0)]), &config);
        assert_eq!(first.final_equity(), second.final_equity());
        assert_eq!(first.equity_curve(), second.equity_curve());
        assert_eq!(first.total_trades(), second.total_trades());
    }

    #[test]
    fn signal_kind_sell_is_ignored_while_flat() {
        struct SellOnly;
        impl Strategy for SellOnly {
            fn name(&self) -> &str {
                "sell_only"
            }
            fn generate_signal(&mut self, _bars: &[Bar], index: usize) -> TradeSignal {
                TradeSignal {
                    kind: SignalKind::Sell,
                    bar_index: index,
                    stop_loss: 0.0,
                    take_profit: 0.0,
                    reason: "sell".into(),
                }
            }
        }
        let bars = make_bars(&[100.0; 5]);
        let report = run_backtest(&bars, &mut SellOnly, &SimConfig::default());
        assert_eq!(report.total_trades(), 0);
    }
}
