//! Error types for the monitor

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single remote analytics query.
///
/// The evaluator collapses every variant into a per-symbol failure flag, but the
/// variants stay distinct so logs can tell a timeout from a rejected request.
#[derive(Error, Debug)]
pub enum QueryError {
    /// Connection failure or timeout
    #[error("transport error calling {url}: {message}")]
    Transport { url: String, message: String },

    /// Non-success HTTP status
    #[error("server returned {status} for {url}: {message}")]
    Server {
        url: String,
        status: u16,
        message: String,
    },

    /// HTTP 422 with field-level detail
    #[error("validation failed for {url}: {message} ({} field errors)", .errors.len())]
    Validation {
        url: String,
        message: String,
        errors: Vec<String>,
    },

    /// Success status with a body we could not decode
    #[error("malformed response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl QueryError {
    /// Short label used as the `kind` field in logs
    pub fn kind(&self) -> &'static str {
        match self {
            QueryError::Transport { .. } => "transport",
            QueryError::Server { .. } => "server",
            QueryError::Validation { .. } => "validation",
            QueryError::Decode { .. } => "decode",
        }
    }

    /// Whether another attempt could succeed without changing the request
    pub fn is_transient(&self) -> bool {
        match self {
            QueryError::Transport { .. } => true,
            QueryError::Server { status, .. } => *status >= 500,
            QueryError::Validation { .. } | QueryError::Decode { .. } => false,
        }
    }
}

/// Failure delivering a rendered report.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("invalid mailbox '{0}'")]
    Address(String),

    #[error("failed to build email message: {0}")]
    Message(String),

    #[error("SMTP delivery failed: {0}")]
    Transport(String),
}

/// Problems loading or validating the configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no configuration file given: pass a path as the first argument or set GATSIVA_CONFIG_FILE")]
    MissingPath,

    #[error("configuration file {} does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not formatted properly: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Fatal errors that end the scheduler loop.
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("failed to render report: {0}")]
    Render(#[from] std::fmt::Error),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}
