//! Run aggregation and the notify decision

use futures_util::stream::{self, StreamExt};
use tracing::{debug, info};

use super::evaluator::SymbolEvaluator;
use crate::models::{NotifyPolicy, RunReport, SymbolConfig, SymbolOutcome};

pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Evaluates every configured symbol and decides whether the run is worth
/// sending.
pub struct RunAggregator {
    evaluator: SymbolEvaluator,
    max_concurrency: usize,
}

impl RunAggregator {
    pub fn new(evaluator: SymbolEvaluator) -> Self {
        Self {
            evaluator,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Limit how many symbols are queried at once (minimum 1)
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Evaluate all symbols and build the report.
    ///
    /// Symbols are evaluated concurrently but the report keeps configuration
    /// order. Returns the report and whether it should be delivered.
    pub async fn run_once(
        &self,
        symbols: &[SymbolConfig],
        policy: NotifyPolicy,
    ) -> (RunReport, bool) {
        let started_at = chrono::Utc::now();
        let mut found_true = false;
        let mut found_error = false;
        let mut outcomes: Vec<SymbolOutcome> = Vec::with_capacity(symbols.len());

        // `buffered` yields in input order regardless of completion order
        let mut evaluations = stream::iter(symbols)
            .map(|config| self.evaluator.evaluate(config))
            .buffered(self.max_concurrency);

        while let Some(outcome) = evaluations.next().await {
            found_true |= outcome.any_trigger_true();
            found_error |= outcome.any_query_failed();
            debug!(
                symbol = %outcome.symbol(),
                triggers = outcome.trigger_results().len(),
                indicators = outcome.indicator_results().len(),
                trigger_query_failed = outcome.trigger_query_failed(),
                indicator_query_failed = outcome.indicator_query_failed(),
                "Evaluated {}",
                outcome.symbol()
            );
            outcomes.push(outcome);
        }

        let report = RunReport::new(outcomes, started_at);
        let should_notify = policy.should_notify(found_true, found_error);

        info!(
            symbols = report.len(),
            any_trigger_true = found_true,
            any_query_failed = found_error,
            should_notify = should_notify,
            "Run complete for {} symbols",
            report.len()
        );

        (report, should_notify)
    }
}
