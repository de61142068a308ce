//! reqwest-backed client for the Gatsiva public API

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::messages::{
    ConditionsRequest, ConditionsResponse, ErrorBody, IndicatorsRequest, IndicatorsResponse,
};
use super::{AnalyticsClient, IndicatorStatus, TriggerStatus};
use crate::error::QueryError;
use crate::models::{IndicatorResult, TriggerResult};

pub const CONDITIONS_PATH: &str = "/conditions/status";
pub const INDICATORS_PATH: &str = "/indicators/status";

/// First backoff delay between attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);

pub struct GatsivaRestClient {
    base_url: String,
    client: reqwest::Client,
    retry_attempts: usize,
    retry_delay: Duration,
}

impl GatsivaRestClient {
    /// Create a client whose every request is bounded by `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base_url, client))
    }

    /// Use a preconfigured reqwest client (tests point this at a mock server)
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
            retry_attempts: 0,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Retry transient failures up to `attempts` extra times
    pub fn with_retries(mut self, attempts: usize, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, QueryError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let url = url.as_str();

        (|| self.post_once::<B, R>(url, body))
            .retry(
                ExponentialBuilder::default()
                    .with_min_delay(self.retry_delay)
                    .with_max_times(self.retry_attempts),
            )
            .when(QueryError::is_transient)
            .notify(|err: &QueryError, after: Duration| {
                warn!(
                    url = %url,
                    kind = err.kind(),
                    error = %err,
                    retry_in = ?after,
                    "Analytics request failed, retrying in {:?}",
                    after
                );
            })
            .await
    }

    async fn post_once<B, R>(&self, url: &str, body: &B) -> Result<R, QueryError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned,
    {
        debug!(url = %url, "POST {}", url);

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error(url, &e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(url, &e))?;

        if status == StatusCode::OK {
            return serde_json::from_str(&text).map_err(|e| QueryError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            });
        }

        let error_body: ErrorBody = serde_json::from_str(&text).unwrap_or_default();
        let message = error_body.message.clone().unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

        if status == StatusCode::UNPROCESSABLE_ENTITY {
            Err(QueryError::Validation {
                url: url.to_string(),
                message,
                errors: error_body.field_errors(),
            })
        } else {
            Err(QueryError::Server {
                url: url.to_string(),
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait]
impl AnalyticsClient for GatsivaRestClient {
    async fn query_triggers(
        &self,
        symbol: &str,
        conditions: &[String],
    ) -> Result<TriggerStatus, QueryError> {
        let request = ConditionsRequest { symbol, conditions };
        let response: ConditionsResponse = self.post(CONDITIONS_PATH, &request).await?;

        Ok(TriggerStatus {
            last_timestamp: response.last_timestamp.and_then(from_epoch),
            conditions: response
                .conditions
                .into_iter()
                .map(|c| TriggerResult {
                    definition: c.definition,
                    value: c.value,
                })
                .collect(),
        })
    }

    async fn query_indicators(
        &self,
        symbol: &str,
        indicators: &[String],
    ) -> Result<IndicatorStatus, QueryError> {
        let request = IndicatorsRequest { symbol, indicators };
        let response: IndicatorsResponse = self.post(INDICATORS_PATH, &request).await?;

        Ok(IndicatorStatus {
            last_timestamp: response.last_timestamp.and_then(from_epoch),
            indicators: response
                .indicators
                .into_iter()
                .map(|i| IndicatorResult {
                    definition: i.indicator,
                    value: i.value,
                })
                .collect(),
        })
    }
}

fn transport_error(url: &str, err: &reqwest::Error) -> QueryError {
    let message = if err.is_timeout() {
        format!("request timed out: {}", err)
    } else {
        err.to_string()
    };
    QueryError::Transport {
        url: url.to_string(),
        message,
    }
}

fn from_epoch(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}
