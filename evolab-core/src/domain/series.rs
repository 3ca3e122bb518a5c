//! Upstream-contract checks for a loaded bar series.
//!
//! The engine assumes its input is already validated (ordered timestamps,
//! finite OHLCV); malformed rows are dropped by the external loader. This
//! module gives callers a way to verify that contract up front. Nothing in
//! the engine itself calls `validate`: insufficient or empty input is
//! always handled with sentinels and empty results, never a fault.

use thiserror::Error;

use super::Bar;

/// Violations of the loader contract.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeriesError {
    #[error("timestamp at bar {index} precedes the previous bar")]
    NonMonotonicTimestamp { index: usize },
    #[error("non-finite OHLCV value at bar {index}")]
    NonFiniteValue { index: usize },
}

/// Check that timestamps are non-decreasing and all OHLCV values finite.
pub fn validate(bars: &[Bar]) -> Result<(), SeriesError> {
    for (index, bar) in bars.iter().enumerate() {
        if bar.is_void() {
            return Err(SeriesError::NonFiniteValue { index });
        }
        if index > 0 && bar.timestamp < bars[index - 1].timestamp {
            return Err(SeriesError::NonMonotonicTimestamp { index });
        }
    }
    Ok(())
}
