pub mod aggregator;
pub mod signal;

pub use aggregator::{AggregationMode, SignalAggregator, DEFAULT_HORIZON};
pub use signal::{SignalKey, SignalKind, SignalState};
