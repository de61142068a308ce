//! Per-symbol query results

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Truth value of one trigger condition as reported by the analytics service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerResult {
    pub definition: String,
    pub value: bool,
}

/// Display value of one indicator. The value is kept exactly as the service
/// formatted it and is never parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorResult {
    pub definition: String,
    pub value: String,
}

/// Everything learned about one symbol during a run.
///
/// A result list is `Some` only when its query succeeded, so the failure
/// flags and the populated lists can never disagree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolOutcome {
    symbol: String,
    last_timestamp: Option<DateTime<Utc>>,
    triggers: Option<Vec<TriggerResult>>,
    indicators: Option<Vec<IndicatorResult>>,
}

impl SymbolOutcome {
    /// Build an outcome; `None` marks the corresponding query as failed.
    pub fn new(
        symbol: impl Into<String>,
        last_timestamp: Option<DateTime<Utc>>,
        triggers: Option<Vec<TriggerResult>>,
        indicators: Option<Vec<IndicatorResult>>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            last_timestamp,
            triggers,
            indicators,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Last market timestamp the service had data for
    pub fn last_timestamp(&self) -> Option<DateTime<Utc>> {
        self.last_timestamp
    }

    /// Trigger results in the order the service returned them; empty on failure
    pub fn trigger_results(&self) -> &[TriggerResult] {
        self.triggers.as_deref().unwrap_or_default()
    }

    /// Indicator results in the order the service returned them; empty on failure
    pub fn indicator_results(&self) -> &[IndicatorResult] {
        self.indicators.as_deref().unwrap_or_default()
    }

    pub fn trigger_query_failed(&self) -> bool {
        self.triggers.is_none()
    }

    pub fn indicator_query_failed(&self) -> bool {
        self.indicators.is_none()
    }

    pub fn any_query_failed(&self) -> bool {
        self.trigger_query_failed() || self.indicator_query_failed()
    }

    pub fn any_trigger_true(&self) -> bool {
        self.trigger_results().iter().any(|t| t.value)
    }

    /// Definitions of the triggers that evaluated true
    pub fn fired_triggers(&self) -> impl Iterator<Item = &str> {
        self.trigger_results()
            .iter()
            .filter(|t| t.value)
            .map(|t| t.definition.as_str())
    }
}
