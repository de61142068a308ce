//! Data model shared by the evaluator, aggregator and report rendering.

pub mod outcome;
pub mod policy;
pub mod report;
pub mod symbol;

pub use outcome::{IndicatorResult, SymbolOutcome, TriggerResult};
pub use policy::NotifyPolicy;
pub use report::RunReport;
pub use symbol::SymbolConfig;
