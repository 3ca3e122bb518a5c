//! Domain types: bars, signals, positions, trades.

pub mod bar;
pub mod position;
pub mod series;
pub mod signal;
pub mod trade;

pub use bar::{span_days, Bar};
pub use position::OpenPosition;
pub use series::{validate, SeriesError};
pub use signal::{SignalKind, TradeSignal};
pub use trade::{ExitReason, TradeRecord};
