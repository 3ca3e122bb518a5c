//! Bar: one OHLCV price observation for a fixed time interval.

use chrono::{Datelike, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single price bar.
///
/// Bars arrive from an external loader already ordered by timestamp with
/// finite OHLCV values; the engine treats a loaded series as immutable.
/// Bar frequency is not fixed (intraday and daily series both occur), so
/// nothing here assumes one bar per day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Calendar year of this bar, used for yearly PnL bucketing.
    pub fn year(&self) -> i32 {
        self.timestamp.year()
    }

    /// Returns true if any OHLCV field is non-finite.
    pub fn is_void(&self) -> bool {
        !(self.open.is_finite()
            && self.high.is_finite()
            && self.low.is_finite()
            && self.close.is_finite()
            && self.volume.is_finite())
    }

    /// Basic OHLC sanity check: high is the top of the range, low the bottom.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.close > 0.0
    }
}

/// Number of calendar days spanned by a series, first bar to last.
///
/// Zero for series shorter than two bars. The adaptive strategy derives its
/// lookback windows from this, keeping its memory horizon roughly constant
/// in calendar time regardless of bar frequency.
pub fn span_days(bars: &[Bar]) -> i64 {
    match (bars.first(), bars.last()) {
        (Some(first), Some(last)) if bars.len() >= 2 => {
            (last.timestamp - first.timestamp).num_days()
        }
        _ => 0,
    }
}
