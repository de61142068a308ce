//! Unit tests for configuration loading

use gatsmonitor::config::{resolve_config_path, LogType, MonitorConfig, SmtpSecurity};
use gatsmonitor::error::ConfigError;
use serde_json::json;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::NamedTempFile;

fn email_section() -> serde_json::Value {
    json!({
        "from_smtp_host": "smtp.example.com",
        "from_smtp_username": "monitor",
        "from_smtp_password": "secret",
        "from_smtp_type": "ssl",
        "from_smtp_port": 465,
        "from_address": "monitor@example.com",
        "from_name": "Monitor",
        "to_address": "trader@example.com",
        "to_name": "Trader"
    })
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

fn full_config() -> serde_json::Value {
    json!({
        "run_once": false,
        "log_debug": true,
        "log_type": "file",
        "email_always": false,
        "email_on_errors": true,
        "api_service_url": "https://api.gatsiva.com/api/v1",
        "sleep_mins": 15,
        "symbols": {
            "LTC:USD:daily": {"triggers": ["sma(28) crosses sma(14)"], "indicators": ["close(1)"]},
            "BTC:USD:daily": {"triggers": [], "indicators": ["price change percentage(28)"]},
            "ETH:USD:hourly": {"triggers": ["rsi(14) crosses above 70"]}
        },
        "email": email_section()
    })
}

#[test]
fn loads_full_configuration() {
    let file = write_config(&full_config().to_string());
    let config = MonitorConfig::load(file.path()).expect("valid config");

    assert!(config.log_debug);
    assert_eq!(config.log_type, LogType::File);
    assert_eq!(config.cadence(), Duration::from_secs(15 * 60));
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.max_concurrency, 4);
    assert_eq!(config.retry_attempts, 2);
    assert!(config.policy().email_on_errors);
    assert!(!config.policy().email_always);

    let email = &config.email;
    assert_eq!(email.from_smtp_type, SmtpSecurity::Ssl);
    assert_eq!(email.from_smtp_port, 465);
    assert!(!format!("{:?}", email).contains("secret"));
}

#[test]
fn symbols_keep_file_order() {
    let file = write_config(&full_config().to_string());
    let config = MonitorConfig::load(file.path()).unwrap();

    let names: Vec<&str> = config.symbols.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(names, vec!["LTC:USD:daily", "BTC:USD:daily", "ETH:USD:hourly"]);
    assert!(config.symbols[1].triggers.is_empty());
    assert!(config.symbols[2].indicators.is_empty());
}

#[test]
fn unknown_log_type_falls_back_to_stderr() {
    let mut value = full_config();
    value["log_type"] = json!("syslog");
    let file = write_config(&value.to_string());
    let config = MonitorConfig::load(file.path()).unwrap();
    assert_eq!(config.log_type, LogType::Stderr);
}

#[test]
fn missing_file_is_reported() {
    let err = MonitorConfig::load(&PathBuf::from("/nonexistent/gatsmonitor.json")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn malformed_json_is_a_parse_error() {
    let file = write_config("{ \"api_service_url\": ");
    let err = MonitorConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
fn zero_cadence_is_rejected_unless_run_once() {
    let mut value = full_config();
    value["sleep_mins"] = json!(0);
    let file = write_config(&value.to_string());
    assert!(matches!(
        MonitorConfig::load(file.path()),
        Err(ConfigError::Invalid(_))
    ));

    value["run_once"] = json!(true);
    let file = write_config(&value.to_string());
    assert!(MonitorConfig::load(file.path()).is_ok());
}

#[test]
fn email_section_is_required() {
    let quiet = json!({
        "api_service_url": "http://localhost:8080",
        "run_once": true,
        "symbols": {}
    });
    let file = write_config(&quiet.to_string());
    assert!(matches!(
        MonitorConfig::load(file.path()),
        Err(ConfigError::Parse { .. })
    ));

    let mut quiet = quiet;
    quiet["email"] = email_section();
    let file = write_config(&quiet.to_string());
    let config = MonitorConfig::load(file.path()).unwrap();
    assert!(config.symbols.is_empty());
    assert_eq!(config.email.to_address, "trader@example.com");
}

#[test]
fn fractional_sleep_minutes_are_accepted() {
    let mut value = full_config();
    value["sleep_mins"] = json!(0.5);
    let file = write_config(&value.to_string());
    let config = MonitorConfig::load(file.path()).expect("fractional minutes load");
    assert_eq!(config.cadence(), Duration::from_secs(30));
}

#[test]
fn sleep_minutes_must_fit_a_duration() {
    for sleep_mins in [json!(1e18), json!(-1.0)] {
        let mut value = full_config();
        value["sleep_mins"] = sleep_mins;
        let file = write_config(&value.to_string());
        assert!(matches!(
            MonitorConfig::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }
}

#[test]
fn api_url_must_be_http() {
    let mut value = full_config();
    value["api_service_url"] = json!("api.gatsiva.com");
    let file = write_config(&value.to_string());
    assert!(matches!(
        MonitorConfig::load(file.path()),
        Err(ConfigError::Invalid(_))
    ));
}

#[test]
fn environment_variable_wins_over_argument() {
    let source = resolve_config_path(
        Some(PathBuf::from("/etc/gats/env.json")),
        Some(PathBuf::from("arg.json")),
    )
    .unwrap();
    assert_eq!(source.path, PathBuf::from("/etc/gats/env.json"));
    assert_eq!(source.ignored_argument, Some(PathBuf::from("arg.json")));

    let source = resolve_config_path(None, Some(PathBuf::from("arg.json"))).unwrap();
    assert_eq!(source.path, PathBuf::from("arg.json"));
    assert_eq!(source.ignored_argument, None);

    let source = resolve_config_path(Some(PathBuf::new()), Some(PathBuf::from("arg.json"))).unwrap();
    assert_eq!(source.path, PathBuf::from("arg.json"));

    assert!(matches!(
        resolve_config_path(None, None),
        Err(ConfigError::MissingPath)
    ));
}
