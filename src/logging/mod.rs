//! Logging initialization with environment-based formatters
//!
//! - Production: Structured JSON logs for log aggregation
//! - Sandbox: Colorful, human-readable logs for development
//!
//! Output goes to stderr, or to a timestamped file when the configuration
//! asks for `log_type: "file"`.

use crate::config::{get_environment, LogType};
use chrono::Utc;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Settings taken from the monitor configuration
#[derive(Debug, Clone, Default)]
pub struct LogSettings {
    pub debug: bool,
    pub log_type: LogType,
    pub log_dir: Option<PathBuf>,
}

/// Name of the log file for a run started now: `<YYYYmmddHHMMSS>-<version>.log`
pub fn log_file_name() -> String {
    format!(
        "{}-{}.log",
        Utc::now().format("%Y%m%d%H%M%S"),
        env!("CARGO_PKG_VERSION")
    )
}

fn default_filter(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("info,gatsmonitor=debug")
    } else {
        EnvFilter::new("info")
    }
}

/// Initialize logging based on the environment and the configured sink.
///
/// `RUST_LOG` overrides the level chosen by `debug`. Returns the log file path
/// when logging to a file.
pub fn init_logging(settings: &LogSettings) -> std::io::Result<Option<PathBuf>> {
    let env = get_environment();
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(settings.debug));

    let is_production = matches!(env.as_str(), "production" | "prod");

    let (writer, log_path) = match settings.log_type {
        LogType::File => {
            let dir = settings.log_dir.as_deref().unwrap_or_else(|| Path::new("."));
            let path = dir.join(log_file_name());
            let file = File::create(&path)?;
            (BoxMakeWriter::new(Mutex::new(file)), Some(path))
        }
        LogType::Stderr => (BoxMakeWriter::new(std::io::stderr), None),
    };
    let ansi = log_path.is_none();

    if is_production {
        // Production: Structured JSON logs
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_writer(writer),
            )
            .init();
    } else {
        // Sandbox/Development: human-readable, colored when writing to a terminal stream
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .init();
    }

    Ok(log_path)
}
