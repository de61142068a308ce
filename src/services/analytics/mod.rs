//! Remote analytics service: trigger and indicator status queries.

pub mod client;
pub mod messages;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::QueryError;
use crate::models::{IndicatorResult, TriggerResult};

pub use client::{GatsivaRestClient, DEFAULT_RETRY_DELAY};

/// Decoded trigger-status response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TriggerStatus {
    pub last_timestamp: Option<DateTime<Utc>>,
    pub conditions: Vec<TriggerResult>,
}

/// Decoded indicator-status response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorStatus {
    pub last_timestamp: Option<DateTime<Utc>>,
    pub indicators: Vec<IndicatorResult>,
}

/// Queries the analytics service evaluates on our behalf.
///
/// Either call yields the whole result set or an error; partial results are
/// never synthesized.
#[async_trait]
pub trait AnalyticsClient: Send + Sync {
    /// Truth value of each condition for `symbol`
    async fn query_triggers(
        &self,
        symbol: &str,
        conditions: &[String],
    ) -> Result<TriggerStatus, QueryError>;

    /// Current value of each indicator for `symbol`
    async fn query_indicators(
        &self,
        symbol: &str,
        indicators: &[String],
    ) -> Result<IndicatorStatus, QueryError>;
}
