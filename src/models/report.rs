//! The assembled result of one monitoring run

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::outcome::SymbolOutcome;

/// Outcomes for every configured symbol, in configuration order.
///
/// Built once per run and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    generated_at: DateTime<Utc>,
    outcomes: Vec<SymbolOutcome>,
    any_trigger_true: bool,
    any_query_failed: bool,
}

impl RunReport {
    pub fn new(outcomes: Vec<SymbolOutcome>, generated_at: DateTime<Utc>) -> Self {
        let any_trigger_true = outcomes.iter().any(SymbolOutcome::any_trigger_true);
        let any_query_failed = outcomes.iter().any(SymbolOutcome::any_query_failed);
        Self {
            generated_at,
            outcomes,
            any_trigger_true,
            any_query_failed,
        }
    }

    pub fn outcomes(&self) -> &[SymbolOutcome] {
        &self.outcomes
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn any_trigger_true_overall(&self) -> bool {
        self.any_trigger_true
    }

    /// True when any trigger or indicator query failed for any symbol
    pub fn any_query_failed_overall(&self) -> bool {
        self.any_query_failed
    }

    /// Symbols with at least one failed query
    pub fn failed_symbols(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.any_query_failed())
            .map(SymbolOutcome::symbol)
    }
}
