//! One monitoring iteration: aggregate, decide, deliver

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use super::aggregator::RunAggregator;
use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::models::{NotifyPolicy, SymbolConfig};
use crate::report;
use crate::services::notifier::Notifier;

/// Configuration for the monitor runtime
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub symbols: Vec<SymbolConfig>,
    pub policy: NotifyPolicy,
    pub cadence: Duration,
    pub run_once: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            policy: NotifyPolicy::default(),
            cadence: Duration::from_secs(300),
            run_once: false,
        }
    }
}

impl From<&MonitorConfig> for RuntimeConfig {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            symbols: config.symbols.clone(),
            policy: config.policy(),
            cadence: config.cadence(),
            run_once: config.run_once,
        }
    }
}

/// What happened to the report at the end of an iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The policy suppressed the report
    Skipped,
    Sent,
    /// The notifier failed; the error is only logged
    Failed(String),
}

/// Summary of a finished iteration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IterationSummary {
    pub symbols: usize,
    pub any_trigger_true: bool,
    pub any_query_failed: bool,
    pub delivery: Delivery,
}

/// Runs iterations against injected collaborators
pub struct MonitorRuntime {
    config: RuntimeConfig,
    aggregator: RunAggregator,
    notifier: Arc<dyn Notifier>,
}

impl MonitorRuntime {
    pub fn new(
        config: RuntimeConfig,
        aggregator: RunAggregator,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            aggregator,
            notifier,
        }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Evaluate every symbol and deliver the report when the policy says so.
    ///
    /// Query and delivery failures are absorbed; an error here is fatal.
    pub async fn run_iteration(&self) -> Result<IterationSummary, MonitorError> {
        info!(symbols = self.config.symbols.len(), "Starting");

        let (report, should_notify) = self
            .aggregator
            .run_once(&self.config.symbols, self.config.policy)
            .await;

        let delivery = if should_notify {
            let email = report::render_email(&report)?;
            match self.notifier.deliver(&email).await {
                Ok(()) => {
                    info!(subject = %email.subject, "Report emailed");
                    Delivery::Sent
                }
                Err(e) => {
                    error!(error = %e, "Message could not be sent");
                    Delivery::Failed(e.to_string())
                }
            }
        } else {
            info!("Nothing to email");
            Delivery::Skipped
        };

        Ok(IterationSummary {
            symbols: report.len(),
            any_trigger_true: report.any_trigger_true_overall(),
            any_query_failed: report.any_query_failed_overall(),
            delivery,
        })
    }
}
