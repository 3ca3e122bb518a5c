//! The evolvable strategy gene.
//!
//! A gene is a flat configuration record: every field is plain data the
//! genetic operators can resample, swap, and serialize. The indicator and
//! condition vocabularies are closed enums for the same reason. Genes are
//! immutable apart from the explicit operators (`mutate` rewrites fields in
//! place; `crossover` produces a child).

use std::fmt;
use std::ops::RangeInclusive;

use evolab_core::indicators::IndicatorKind;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Entry comparison against the configured thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryCondition {
    /// Primary crosses above its threshold between the previous bar and this one.
    CrossAbove,
    /// Primary crosses below its threshold.
    CrossBelow,
    /// Primary and secondary are both above their thresholds.
    Above,
    /// Primary and secondary are both below their thresholds.
    Below,
}

impl EntryCondition {
    pub const ALL: [EntryCondition; 4] = [
        EntryCondition::CrossAbove,
        EntryCondition::CrossBelow,
        EntryCondition::Above,
        EntryCondition::Below,
    ];
}

/// How the exit bracket is derived at entry time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitCondition {
    /// Target distance is the stop distance times the risk/reward ratio.
    FixedRr,
    TrailingStop,
    TimeBased,
    IndicatorSignal,
}

impl ExitCondition {
    pub const ALL: [ExitCondition; 4] = [
        ExitCondition::FixedRr,
        ExitCondition::TrailingStop,
        ExitCondition::TimeBased,
        ExitCondition::IndicatorSignal,
    ];
}

/// Valid ranges for every numeric gene field.
///
/// `random` samples inside these ranges and `mutate` resamples inside them,
/// so a gene never leaves its valid space through the operators.
pub mod bounds {
    use std::ops::RangeInclusive;

    pub const PERIOD: RangeInclusive<usize> = 5..=200;
    pub const THRESHOLD: RangeInclusive<f64> = -50.0..=50.0;
    pub const RISK_REWARD: RangeInclusive<f64> = 1.0..=10.0;
    pub const STOP_TARGET_PCT: RangeInclusive<f64> = 0.005..=0.10;
    pub const HOLD_HOURS: RangeInclusive<u32> = 1..=168;
    pub const SIZE_FRACTION: RangeInclusive<f64> = 0.01..=0.5;
}

/// One candidate strategy configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyGene {
    pub primary_indicator: IndicatorKind,
    pub secondary_indicator: IndicatorKind,
    pub primary_period: usize,
    pub secondary_period: usize,
    pub primary_threshold: f64,
    pub secondary_threshold: f64,
    pub entry_condition: EntryCondition,
    pub exit_condition: ExitCondition,
    pub risk_reward_ratio: f64,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub max_hold_hours: u32,
    pub position_size_pct: f64,
    /// Score from the most recent fitness evaluation.
    pub fitness: f64,
}

impl Default for StrategyGene {
    fn default() -> Self {
        Self {
            primary_indicator: IndicatorKind::Sma,
            secondary_indicator: IndicatorKind::Rsi,
            primary_period: 20,
            secondary_period: 14,
            primary_threshold: 0.0,
            secondary_threshold: 30.0,
            entry_condition: EntryCondition::CrossAbove,
            exit_condition: ExitCondition::FixedRr,
            risk_reward_ratio: 2.0,
            stop_loss_pct: 0.02,
            take_profit_pct: 0.04,
            max_hold_hours: 48,
            position_size_pct: 0.1,
            fitness: 0.0,
        }
    }
}

impl StrategyGene {
    /// Sample a gene uniformly at random within every field's valid range.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            primary_indicator: random_choice(rng, &IndicatorKind::ALL),
            secondary_indicator: random_choice(rng, &IndicatorKind::ALL),
            primary_period: rng.gen_range(bounds::PERIOD),
            secondary_period: rng.gen_range(bounds::PERIOD),
            primary_threshold: rng.gen_range(bounds::THRESHOLD),
            secondary_threshold: rng.gen_range(bounds::THRESHOLD),
            entry_condition: random_choice(rng, &EntryCondition::ALL),
            exit_condition: random_choice(rng, &ExitCondition::ALL),
            risk_reward_ratio: rng.gen_range(bounds::RISK_REWARD),
            stop_loss_pct: rng.gen_range(bounds::STOP_TARGET_PCT),
            take_profit_pct: rng.gen_range(bounds::STOP_TARGET_PCT),
            max_hold_hours: rng.gen_range(bounds::HOLD_HOURS),
            position_size_pct: rng.gen_range(bounds::SIZE_FRACTION),
            fitness: 0.0,
        }
    }

    /// Resample each field independently with probability `rate`.
    ///
    /// Fields are visited in declaration order so a given RNG state always
    /// produces the same mutation.
    pub fn mutate(&mut self, rng: &mut impl Rng, rate: f64) {
        if rng.gen::<f64>() < rate {
            self.primary_indicator = random_choice(rng, &IndicatorKind::ALL);
        }
        if rng.gen::<f64>() < rate {
            self.secondary_indicator = random_choice(rng, &IndicatorKind::ALL);
        }
        if rng.gen::<f64>() < rate {
            self.primary_period = rng.gen_range(bounds::PERIOD);
        }
        if rng.gen::<f64>() < rate {
            self.secondary_period = rng.gen_range(bounds::PERIOD);
        }
        if rng.gen::<f64>() < rate {
            self.primary_threshold = rng.gen_range(bounds::THRESHOLD);
        }
        if rng.gen::<f64>() < rate {
            self.secondary_threshold = rng.gen_range(bounds::THRESHOLD);
        }
        if rng.gen::<f64>() < rate {
            self.entry_condition = random_choice(rng, &EntryCondition::ALL);
        }
        if rng.gen::<f64>() < rate {
            self.exit_condition = random_choice(rng, &ExitCondition::ALL);
        }
        if rng.gen::<f64>() < rate {
            self.risk_reward_ratio = rng.gen_range(bounds::RISK_REWARD);
        }
        if rng.gen::<f64>() < rate {
            self.stop_loss_pct = rng.gen_range(bounds::STOP_TARGET_PCT);
        }
        if rng.gen::<f64>() < rate {
            self.take_profit_pct = rng.gen_range(bounds::STOP_TARGET_PCT);
        }
        if rng.gen::<f64>() < rate {
            self.max_hold_hours = rng.gen_range(bounds::HOLD_HOURS);
        }
        if rng.gen::<f64>() < rate {
            self.position_size_pct = rng.gen_range(bounds::SIZE_FRACTION);
        }
    }

    /// Uniform per-field crossover: each field comes from either parent
    /// with equal probability. The child's fitness starts at zero.
    pub fn crossover(&self, other: &Self, rng: &mut impl Rng) -> Self {
        Self {
            primary_indicator: pick(rng, self.primary_indicator, other.primary_indicator),
            secondary_indicator: pick(rng, self.secondary_indicator, other.secondary_indicator),
            primary_period: pick(rng, self.primary_period, other.primary_period),
            secondary_period: pick(rng, self.secondary_period, other.secondary_period),
            primary_threshold: pick(rng, self.primary_threshold, other.primary_threshold),
            secondary_threshold: pick(rng, self.secondary_threshold, other.secondary_threshold),
            entry_condition: pick(rng, self.entry_condition, other.entry_condition),
            exit_condition: pick(rng, self.exit_condition, other.exit_condition),
            risk_reward_ratio: pick(rng, self.risk_reward_ratio, other.risk_reward_ratio),
            stop_loss_pct: pick(rng, self.stop_loss_pct, other.stop_loss_pct),
            take_profit_pct: pick(rng, self.take_profit_pct, other.take_profit_pct),
            max_hold_hours: pick(rng, self.max_hold_hours, other.max_hold_hours),
            position_size_pct: pick(rng, self.position_size_pct, other.position_size_pct),
            fitness: 0.0,
        }
    }

    /// Bars needed before this gene's strategy can emit a signal.
    pub fn warmup_bars(&self) -> usize {
        self.primary_period.max(self.secondary_period)
    }

    /// True if every numeric field sits inside its valid range.
    pub fn in_bounds(&self) -> bool {
        in_range(&bounds::PERIOD, self.primary_period)
            && in_range(&bounds::PERIOD, self.secondary_period)
            && in_range(&bounds::THRESHOLD, self.primary_threshold)
            && in_range(&bounds::THRESHOLD, self.secondary_threshold)
            && in_range(&bounds::RISK_REWARD, self.risk_reward_ratio)
            && in_range(&bounds::STOP_TARGET_PCT, self.stop_loss_pct)
            && in_range(&bounds::STOP_TARGET_PCT, self.take_profit_pct)
            && in_range(&bounds::HOLD_HOURS, self.max_hold_hours)
            && in_range(&bounds::SIZE_FRACTION, self.position_size_pct)
    }
}

impl fmt::Display for StrategyGene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) @ {:.2} | {}({}) @ {:.2} | entry {:?} | exit {:?} | rr {:.2} | sl {:.3} | tp {:.3} | hold {}h | size {:.2}",
            self.primary_indicator.name(),
            self.primary_period,
            self.primary_threshold,
            self.secondary_indicator.name(),
            self.secondary_period,
            self.secondary_threshold,
            self.entry_condition,
            self.exit_condition,
            self.risk_reward_ratio,
            self.stop_loss_pct,
            self.take_profit_pct,
            self.max_hold_hours,
            self.position_size_pct,
        )
    }
}

fn random_choice<T: Copy>(rng: &mut impl Rng, options: &[T]) -> T {
    options[rng.gen_range(0..options.len())]
}

fn pick<T>(rng: &mut impl Rng, a: T, b: T) -> T {
    if rng.gen_bool(0.5) {
        a
    } else {
        b
    }
}

fn in_range<T: PartialOrd>(range: &RangeInclusive<T>, value: T) -> bool {
    range.contains(&value)
}
