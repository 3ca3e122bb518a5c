//! Whole-series signal tables and the accelerated-path fallback.
//!
//! An external accelerator (e.g. a GPU kernel binding) may precompute the
//! per-bar signal table for the confluence rules. Which table a run uses is
//! decided once, up front: the accelerator's table is taken only when it is
//! present, well-formed, and actually contributed signals; otherwise the
//! CPU path computes the table from the indicator batch. The fallback is
//! informational, never an error.

use tracing::info;

use crate::domain::{Bar, TradeSignal};
use crate::indicators::{gap_detected, IndicatorBatch};

use super::{ConfluenceParams, Strategy};

/// Per-bar BUY decisions with bracket levels, for a whole series.
#[derive(Debug, Clone, Default)]
pub struct SignalTable {
    pub buys: Vec<bool>,
    pub stops: Vec<f64>,
    pub targets: Vec<f64>,
}

impl SignalTable {
    pub fn len(&self) -> usize {
        self.buys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buys.is_empty()
    }

    /// Number of BUY entries in the table.
    pub fn signal_count(&self) -> usize {
        self.buys.iter().filter(|&&b| b).count()
    }

    /// Table rows must line up with the series they were computed from.
    pub fn is_well_formed(&self, bars: &[Bar]) -> bool {
        self.buys.len() == bars.len()
            && self.stops.len() == bars.len()
            && self.targets.len() == bars.len()
    }

    /// CPU computation of the confluence signal table.
    pub fn compute_cpu(bars: &[Bar], params: &ConfluenceParams) -> Self {
        let n = bars.len();
        let mut table = Self {
            buys: vec![false; n],
            stops: vec![0.0; n],
            targets: vec![0.0; n],
        };
        let batch = IndicatorBatch::compute(bars, params.sma_period, params.rsi_period);
        let warmup = params.warmup_bars();

        for i in 0..n {
            if i < warmup {
                continue;
            }
            let close = bars[i].close;
            let uptrend = close > batch.sma[i];
            let oversold = batch.rsi[i] < params.rsi_oversold;
            if uptrend && oversold && gap_detected(bars, i) {
                let (stop, target) = params.bracket(close);
                table.buys[i] = true;
                table.stops[i] = stop;
                table.targets[i] = target;
            }
        }
        table
    }
}

/// An external provider of precomputed signal tables.
///
/// Returning `None` means the path is unavailable; an empty or malformed
/// table means the path ran but failed to contribute. Both cases fall back
/// to the CPU computation.
pub trait SignalAccelerator {
    fn name(&self) -> &str;

    fn compute(&self, bars: &[Bar], params: &ConfluenceParams) -> Option<SignalTable>;
}

/// Pick the signal table for a run: accelerated if it contributed, CPU otherwise.
pub fn resolve_signal_table(
    accelerator: Option<&dyn SignalAccelerator>,
    bars: &[Bar],
    params: &ConfluenceParams,
) -> SignalTable {
    if let Some(accel) = accelerator {
        match accel.compute(bars, params) {
            Some(table) if table.is_well_formed(bars) && table.signal_count() > 0 => {
                info!(
                    accelerator = accel.name(),
                    signals = table.signal_count(),
                    "using accelerated signal table"
                );
                return table;
            }
            Some(_) => {
                info!(
                    accelerator = accel.name(),
                    "accelerated path contributed no signals, falling back to CPU"
                );
            }
            None => {
                info!(
                    accelerator = accel.name(),
                    "accelerated path unavailable, falling back to CPU"
                );
            }
        }
    }
    let table = SignalTable::compute_cpu(bars, params);
    info!(signals = table.signal_count(), "computed CPU signal table");
    table
}

/// Strategy that replays a resolved signal table.
#[derive(Debug, Clone)]
pub struct PrecomputedStrategy {
    table: SignalTable,
}

impl PrecomputedStrategy {
    pub fn new(table: SignalTable) -> Self {
        Self { table }
    }

    /// Resolve the table (accelerated or CPU) and wrap it.
    pub fn resolve(
        accelerator: Option<&dyn SignalAccelerator>,
        bars: &[Bar],
        params: &ConfluenceParams,
    ) -> Self {
        Self::new(resolve_signal_table(accelerator, bars, params))
    }

    pub fn table(&self) -> &SignalTable {
        &self.table
    }
}

impl Strategy for PrecomputedStrategy {
    fn name(&self) -> &str {
        "precomputed"
    }

    fn generate_signal(&mut self, _bars: &[Bar], index: usize) -> TradeSignal {
        if index >= self.table.len() {
            return TradeSignal::none(index, "index out of table range");
        }
        if self.table.buys[index] {
            TradeSignal::buy(
                index,
                self.table.stops[index],
                self.table.targets[index],
                "precomputed setup",
            )
        } else {
            TradeSignal::none(index, "no setup")
        }
    }
}
