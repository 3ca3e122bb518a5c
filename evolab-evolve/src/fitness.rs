//! Fitness evaluation: one full simulated walk-forward per gene.

use std::fmt;

use serde::{Deserialize, Serialize};

use evolab_core::domain::Bar;
use evolab_core::metrics;
use evolab_core::sim::{run_backtest, BacktestReport, SimConfig, SizingPolicy};

use crate::evolved::EvolvedStrategy;
use crate::gene::StrategyGene;

/// Weights blending the component metrics into one scalar score.
///
/// The default emphasizes risk-adjusted return and penalizes drawdown. The
/// blend is a policy, not a law; callers may reweight, but the default is
/// what reproduces historical rankings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessWeights {
    pub sharpe: f64,
    pub total_return: f64,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub drawdown_penalty: f64,
}

impl Default for FitnessWeights {
    fn default() -> Self {
        Self {
            sharpe: 0.4,
            total_return: 0.3,
            win_rate: 0.2,
            profit_factor: 0.1,
            drawdown_penalty: 0.5,
        }
    }
}

/// Derived performance of one gene over one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessResult {
    pub total_return: f64,
    pub sharpe_ratio: f64,
    /// Positive fraction of the equity peak.
    pub max_drawdown: f64,
    pub win_rate: f64,
    pub total_trades: usize,
    pub profit_factor: f64,
    pub calmar_ratio: f64,
    pub fitness_score: f64,
}

impl FitnessResult {
    /// Derive all fields from a completed simulator run.
    pub fn from_report(report: &BacktestReport, weights: &FitnessWeights) -> Self {
        let total_return = metrics::total_return(report.equity_curve());
        let sharpe_ratio = report.sharpe_ratio();
        let max_drawdown = report.max_drawdown();
        let win_rate = report.win_rate();
        let profit_factor = metrics::profit_factor(report.trades());
        let calmar_ratio = metrics::calmar_ratio(report.equity_curve());

        let fitness_score = weights.sharpe * sharpe_ratio
            + weights.total_return * total_return
            + weights.win_rate * win_rate
            + weights.profit_factor * profit_factor
            - weights.drawdown_penalty * max_drawdown;

        Self {
            total_return,
            sharpe_ratio,
            max_drawdown,
            win_rate,
            total_trades: report.total_trades(),
            profit_factor,
            calmar_ratio,
            fitness_score,
        }
    }
}

impl fmt::Display for FitnessResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "return {:.2}% | sharpe {:.4} | maxdd {:.2}% | winrate {:.2}% | trades {} | pf {:.4} | calmar {:.4} | fitness {:.4}",
            self.total_return * 100.0,
            self.sharpe_ratio,
            self.max_drawdown * 100.0,
            self.win_rate * 100.0,
            self.total_trades,
            self.profit_factor,
            self.calmar_ratio,
            self.fitness_score,
        )
    }
}

/// Score one gene with a full simulated walk-forward over the series.
///
/// Never faults: pathological genes simply produce zero-trade runs and a
/// low but finite score. Each call builds its own strategy instance, so
/// concurrent evaluations over the shared series are safe.
pub fn evaluate_gene(
    bars: &[Bar],
    gene: &StrategyGene,
    weights: &FitnessWeights,
    initial_equity: f64,
) -> FitnessResult {
    let mut strategy = EvolvedStrategy::new(gene.clone());
    let config = SimConfig {
        initial_equity,
        sizing: SizingPolicy::RiskFraction(gene.position_size_pct),
    };
    let report = run_backtest(bars, &mut strategy, &config);
    FitnessResult::from_report(&report, weights)
}
