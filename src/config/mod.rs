//! Monitor configuration: environment helpers, the JSON config schema and
//! config file resolution.

mod symbols;

use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::models::{NotifyPolicy, SymbolConfig};

/// Environment variable naming the configuration file
pub const CONFIG_ENV_VAR: &str = "GATSIVA_CONFIG_FILE";

/// Deployment environment (`APP_ENV`), defaults to `sandbox`
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

/// Where log output goes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogType {
    /// A timestamped file in the log directory
    File,
    #[default]
    #[serde(other)]
    Stderr,
}

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// STARTTLS upgrade on a plain connection
    #[default]
    Tls,
    /// Implicit TLS from the first byte
    Ssl,
    /// Plain text, only for local relays
    None,
}

#[derive(Clone, Deserialize)]
pub struct EmailConfig {
    pub from_smtp_host: String,
    #[serde(default)]
    pub from_smtp_username: String,
    #[serde(default)]
    pub from_smtp_password: String,
    #[serde(default)]
    pub from_smtp_type: SmtpSecurity,
    pub from_smtp_port: u16,
    pub from_address: String,
    #[serde(default)]
    pub from_name: String,
    pub to_address: String,
    #[serde(default)]
    pub to_name: String,
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("from_smtp_host", &self.from_smtp_host)
            .field("from_smtp_username", &self.from_smtp_username)
            .field("from_smtp_password", &"<redacted>")
            .field("from_smtp_type", &self.from_smtp_type)
            .field("from_smtp_port", &self.from_smtp_port)
            .field("from_address", &self.from_address)
            .field("from_name", &self.from_name)
            .field("to_address", &self.to_address)
            .field("to_name", &self.to_name)
            .finish()
    }
}

fn default_sleep_mins() -> f64 {
    5.0
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_concurrency() -> usize {
    4
}

fn default_retry_attempts() -> usize {
    2
}

/// Contents of the monitor's JSON configuration file
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub run_once: bool,
    #[serde(default)]
    pub log_debug: bool,
    #[serde(default)]
    pub log_type: LogType,
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    #[serde(default)]
    pub email_always: bool,
    #[serde(default)]
    pub email_on_errors: bool,
    pub api_service_url: String,
    /// Minutes between run starts; fractions are allowed
    #[serde(default = "default_sleep_mins")]
    pub sleep_mins: f64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: usize,
    /// Symbols in the order they appear in the file
    #[serde(default, deserialize_with = "symbols::in_file_order")]
    pub symbols: Vec<SymbolConfig>,
    pub email: EmailConfig,
}

impl MonitorConfig {
    /// Read, parse and validate a configuration file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.api_service_url.trim();
        if url.is_empty() {
            return Err(ConfigError::Invalid("api_service_url is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api_service_url '{}' must start with http:// or https://",
                url
            )));
        }
        let cadence = cadence_from_mins(self.sleep_mins)?;
        if !self.run_once && cadence.is_zero() {
            return Err(ConfigError::Invalid(
                "sleep_mins must be > 0 unless run_once is set".into(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid("request_timeout_secs must be > 0".into()));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::Invalid("max_concurrency must be > 0".into()));
        }

        let mut seen = std::collections::HashSet::new();
        for symbol in &self.symbols {
            if symbol.symbol.trim().is_empty() {
                return Err(ConfigError::Invalid("symbol names must not be empty".into()));
            }
            if !seen.insert(symbol.symbol.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "symbol '{}' is configured more than once",
                    symbol.symbol
                )));
            }
        }

        Ok(())
    }

    pub fn policy(&self) -> NotifyPolicy {
        NotifyPolicy::new(self.email_always, self.email_on_errors)
    }

    /// Wait between the start of one run and the start of the next.
    ///
    /// `validate` has already rejected values that do not fit a `Duration`.
    pub fn cadence(&self) -> Duration {
        cadence_from_mins(self.sleep_mins).unwrap_or(Duration::MAX)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn cadence_from_mins(mins: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(mins * 60.0).map_err(|_| {
        ConfigError::Invalid(format!(
            "sleep_mins must be a finite, non-negative number of minutes, got {}",
            mins
        ))
    })
}

/// Which configuration file to load and, if a positional argument lost to the
/// environment variable, the argument that was ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSource {
    pub path: PathBuf,
    pub ignored_argument: Option<PathBuf>,
}

/// Pick the config path: the environment variable wins over the argument.
pub fn resolve_config_path(
    env_value: Option<PathBuf>,
    argument: Option<PathBuf>,
) -> Result<ConfigSource, ConfigError> {
    let env_value = env_value.filter(|p| !p.as_os_str().is_empty());
    match (env_value, argument) {
        (Some(path), ignored_argument) => Ok(ConfigSource {
            path,
            ignored_argument,
        }),
        (None, Some(path)) => Ok(ConfigSource {
            path,
            ignored_argument: None,
        }),
        (None, None) => Err(ConfigError::MissingPath),
    }
}

/// Read `GATSIVA_CONFIG_FILE` from the process environment
pub fn config_path_from_env() -> Option<PathBuf> {
    env::var_os(CONFIG_ENV_VAR).map(PathBuf::from)
}
