//! Gene-driven strategy.
//!
//! Dispatches indicator choice and entry comparison according to a
//! `StrategyGene`. Both indicator series are precomputed on the first
//! signal query and cached for the lifetime of the instance.

use evolab_core::domain::{Bar, TradeSignal};
use evolab_core::indicators::compute_series;
use evolab_core::strategy::Strategy;

use crate::gene::{EntryCondition, ExitCondition, StrategyGene};

/// Strategy materialized from one gene, bound to one series.
#[derive(Debug, Clone)]
pub struct EvolvedStrategy {
    gene: StrategyGene,
    primary: Vec<f64>,
    secondary: Vec<f64>,
    precomputed: bool,
}

impl EvolvedStrategy {
    pub fn new(gene: StrategyGene) -> Self {
        Self {
            gene,
            primary: Vec::new(),
            secondary: Vec::new(),
            precomputed: false,
        }
    }

    pub fn gene(&self) -> &StrategyGene {
        &self.gene
    }

    fn precompute(&mut self, bars: &[Bar]) {
        self.primary = compute_series(self.gene.primary_indicator, bars, self.gene.primary_period);
        self.secondary = compute_series(
            self.gene.secondary_indicator,
            bars,
            self.gene.secondary_period,
        );
        self.precomputed = true;
    }

    fn entry_met(&self, index: usize) -> bool {
        let primary = self.primary[index];
        let secondary = self.secondary[index];
        let p_threshold = self.gene.primary_threshold;
        let s_threshold = self.gene.secondary_threshold;

        match self.gene.entry_condition {
            EntryCondition::CrossAbove => {
                primary > p_threshold && self.primary[index - 1] <= p_threshold
            }
            EntryCondition::CrossBelow => {
                primary < p_threshold && self.primary[index - 1] >= p_threshold
            }
            EntryCondition::Above => primary > p_threshold && secondary > s_threshold,
            EntryCondition::Below => primary < p_threshold && secondary < s_threshold,
        }
    }

    fn bracket(&self, entry: f64) -> (f64, f64) {
        let stop = entry * (1.0 - self.gene.stop_loss_pct);
        let target = match self.gene.exit_condition {
            ExitCondition::FixedRr => entry + (entry - stop) * self.gene.risk_reward_ratio,
            _ => entry * (1.0 + self.gene.take_profit_pct),
        };
        (stop, target)
    }
}

impl Strategy for EvolvedStrategy {
    fn name(&self) -> &str {
        "evolved"
    }

    fn generate_signal(&mut self, bars: &[Bar], index: usize) -> TradeSignal {
        if !self.precomputed || self.primary.len() != bars.len() {
            self.precompute(bars);
        }

        // Warm-up gate: also covers pathological genes whose periods exceed
        // the series length, which therefore never fire.
        if index >= bars.len() || index < self.gene.warmup_bars() || index == 0 {
            return TradeSignal::none(index, "insufficient history");
        }

        if self.entry_met(index) {
            let (stop, target) = self.bracket(bars[index].close);
            TradeSignal::buy(index, stop, target, "gene entry")
        } else {
            TradeSignal::none(index, "no entry")
        }
    }
}
