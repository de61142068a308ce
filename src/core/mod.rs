//! Core engine: symbol evaluation, run aggregation and scheduling

pub mod aggregator;
pub mod evaluator;
pub mod runtime;
pub mod scheduler;

pub use aggregator::RunAggregator;
pub use evaluator::SymbolEvaluator;
pub use runtime::{Delivery, IterationSummary, MonitorRuntime, RuntimeConfig};
pub use scheduler::{next_delay, MonitorScheduler};
