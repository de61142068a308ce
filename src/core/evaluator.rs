//! Per-symbol evaluation: both remote queries reduced into one outcome

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::error::QueryError;
use crate::models::{SymbolConfig, SymbolOutcome};
use crate::services::analytics::AnalyticsClient;

/// Runs the trigger and indicator queries for a symbol.
///
/// Query errors stop here: they are logged with their kind and turned into
/// the outcome's failure flags.
#[derive(Clone)]
pub struct SymbolEvaluator {
    client: Arc<dyn AnalyticsClient>,
}

impl SymbolEvaluator {
    pub fn new(client: Arc<dyn AnalyticsClient>) -> Self {
        Self { client }
    }

    pub async fn evaluate(&self, config: &SymbolConfig) -> SymbolOutcome {
        let symbol = config.symbol.as_str();
        info!(symbol = %symbol, "Checking {}", symbol);

        // Both queries always run; they report on different data
        let (triggers, indicators) = tokio::join!(
            self.client.query_triggers(symbol, &config.triggers),
            self.client.query_indicators(symbol, &config.indicators),
        );

        let triggers = triggers
            .map_err(|e| log_query_failure(symbol, "trigger", &e))
            .ok();
        let indicators = indicators
            .map_err(|e| log_query_failure(symbol, "indicator", &e))
            .ok();

        let last_timestamp = triggers
            .as_ref()
            .and_then(|t| t.last_timestamp)
            .or_else(|| indicators.as_ref().and_then(|i| i.last_timestamp));

        let outcome = SymbolOutcome::new(
            symbol,
            last_timestamp,
            triggers.map(|t| t.conditions),
            indicators.map(|i| i.indicators),
        );

        for definition in outcome.fired_triggers() {
            debug!(
                symbol = %symbol,
                definition = %definition,
                "Symbol: {}  Definition: {} was true",
                symbol,
                definition
            );
        }

        outcome
    }
}

fn log_query_failure(symbol: &str, query: &'static str, err: &QueryError) {
    match err {
        QueryError::Validation { errors, .. } => error!(
            symbol = %symbol,
            query = query,
            kind = err.kind(),
            error = %err,
            field_errors = ?errors,
            "{} query failed for {}",
            query,
            symbol
        ),
        _ => error!(
            symbol = %symbol,
            query = query,
            kind = err.kind(),
            error = %err,
            "{} query failed for {}",
            query,
            symbol
        ),
    }
}
