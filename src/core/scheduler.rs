//! Fixed-cadence loop driving monitor iterations

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use super::runtime::MonitorRuntime;
use crate::error::MonitorError;

/// Delay before the next iteration: whatever is left of the cadence.
///
/// An iteration that overran the cadence is followed immediately; missed
/// ticks are never queued up.
pub fn next_delay(cadence: Duration, elapsed: Duration) -> Duration {
    cadence.saturating_sub(elapsed)
}

/// Repeats iterations every `cadence`, or once in run-once mode
pub struct MonitorScheduler {
    runtime: Arc<MonitorRuntime>,
    cadence: Duration,
    run_once: bool,
}

impl MonitorScheduler {
    pub fn new(runtime: Arc<MonitorRuntime>) -> Self {
        let cadence = runtime.config().cadence;
        let run_once = runtime.config().run_once;
        Self {
            runtime,
            cadence,
            run_once,
        }
    }

    /// Override the run-once flag from the configuration
    pub fn with_run_once(mut self, run_once: bool) -> Self {
        self.run_once = run_once;
        self
    }

    /// Run at least one iteration; loop forever unless run-once.
    ///
    /// A failed iteration is not retried: the error ends the loop.
    pub async fn run(&self) -> Result<(), MonitorError> {
        info!(
            cadence_secs = self.cadence.as_secs(),
            run_once = self.run_once,
            "MonitorScheduler: started"
        );

        loop {
            let started = Instant::now();
            self.runtime.run_iteration().await?;

            if self.run_once {
                info!("Done executing");
                return Ok(());
            }

            let elapsed = started.elapsed();
            let delay = next_delay(self.cadence, elapsed);
            debug!(
                elapsed_secs = elapsed.as_secs(),
                "Executed for {} seconds",
                elapsed.as_secs()
            );
            info!(
                sleep_secs = delay.as_secs(),
                "Sleeping for {} remaining seconds",
                delay.as_secs()
            );
            sleep(delay).await;
        }
    }
}
