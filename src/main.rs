//! gatsmonitor
//!
//! Loads the JSON configuration, then runs the monitor loop until it finishes
//! (run-once) or the process is interrupted.

use clap::Parser;
use dotenvy::dotenv;
use gatsmonitor::config::{self, MonitorConfig, CONFIG_ENV_VAR};
use gatsmonitor::core::{
    MonitorRuntime, MonitorScheduler, RunAggregator, RuntimeConfig, SymbolEvaluator,
};
use gatsmonitor::error::MonitorError;
use gatsmonitor::logging::{self, LogSettings};
use gatsmonitor::services::{
    AnalyticsClient, GatsivaRestClient, Notifier, SmtpNotifier, DEFAULT_RETRY_DELAY,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "gatsmonitor", version, about = "Gatsiva crypto monitor")]
struct Cli {
    /// JSON configuration file (GATSIVA_CONFIG_FILE takes precedence)
    config: Option<PathBuf>,

    /// Run a single iteration and exit, regardless of `run_once`
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env if present
    dotenv().ok();

    let cli = Cli::parse();

    let config = match load_config(cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error reading configuration. {}", e);
            return ExitCode::FAILURE;
        }
    };

    let settings = LogSettings {
        debug: config.log_debug,
        log_type: config.log_type,
        log_dir: config.log_dir.clone(),
    };
    match logging::init_logging(&settings) {
        Ok(Some(path)) => eprintln!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error opening log file: {}", e);
            return ExitCode::FAILURE;
        }
    }

    match run(config, cli.once).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Monitor stopped");
            ExitCode::FAILURE
        }
    }
}

fn load_config(argument: Option<PathBuf>) -> Result<MonitorConfig, MonitorError> {
    let source = config::resolve_config_path(config::config_path_from_env(), argument)?;
    if let Some(ignored) = &source.ignored_argument {
        eprintln!(
            "** Warning. Ignoring argument {} since {} environment variable was set. **",
            ignored.display(),
            CONFIG_ENV_VAR
        );
    }
    Ok(MonitorConfig::load(&source.path)?)
}

async fn run(config: MonitorConfig, once: bool) -> Result<(), MonitorError> {
    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config::get_environment(),
        api = %config.api_service_url,
        symbols = config.symbols.len(),
        "Starting gatsmonitor"
    );

    let client: Arc<dyn AnalyticsClient> = Arc::new(
        GatsivaRestClient::new(config.api_service_url.clone(), config.request_timeout())
            .map_err(|e| MonitorError::HttpClient(e.to_string()))?
            .with_retries(config.retry_attempts, DEFAULT_RETRY_DELAY),
    );

    let notifier: Arc<dyn Notifier> = Arc::new(SmtpNotifier::new(&config.email)?);

    let aggregator = RunAggregator::new(SymbolEvaluator::new(client))
        .with_max_concurrency(config.max_concurrency);
    let runtime = Arc::new(MonitorRuntime::new(
        RuntimeConfig::from(&config),
        aggregator,
        notifier,
    ));
    let scheduler = MonitorScheduler::new(runtime).with_run_once(config.run_once || once);

    tokio::select! {
        result = scheduler.run() => result,
        _ = signal::ctrl_c() => {
            info!("Shutting down...");
            Ok(())
        }
    }
}
