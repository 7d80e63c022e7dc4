//! Unit tests for configuration loading and validation

use sales_forecast_bot::config::{LogFormat, Settings, PLACEHOLDER_BASE_URL};
use std::io::Write;

fn env(pairs: &[(&str, &str)]) -> config::Map<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_defaults_without_file_or_env() {
    let settings = Settings::load_with_env("does/not/exist.yaml", env(&[])).unwrap();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 5000);
    assert_eq!(settings.webhook.base_url, PLACEHOLDER_BASE_URL);
    assert!(settings.telegram.enabled);
    assert!(settings.telegram.secret_token.is_none());
    assert_eq!(settings.model.max_horizon, 365);
    assert_eq!(settings.logging.format, LogFormat::Json);
    assert!(settings.validate().is_ok());
}

#[test]
fn test_yaml_file_is_applied() {
    let file = write_yaml(
        "server:\n  port: 8081\nmodel:\n  n_estimators: 25\n  path: /tmp/model.json\nlogging:\n  format: pretty\n",
    );

    let settings = Settings::load_with_env(file.path(), env(&[])).unwrap();

    assert_eq!(settings.server.port, 8081);
    assert_eq!(settings.model.n_estimators, 25);
    assert_eq!(settings.model.max_depth, 10);
    assert_eq!(settings.model.path, "/tmp/model.json");
    assert_eq!(settings.logging.format, LogFormat::Pretty);
}

#[test]
fn test_port_variable_overrides_file() {
    let file = write_yaml("server:\n  port: 8081\n");

    let settings = Settings::load_with_env(file.path(), env(&[("PORT", "10000")])).unwrap();

    assert_eq!(settings.server.port, 10000);
}

#[test]
fn test_prefixed_environment_overrides() {
    let settings = Settings::load_with_env(
        "missing.yaml",
        env(&[
            ("SALES_FORECAST__MODEL__N_ESTIMATORS", "50"),
            ("SALES_FORECAST__TELEGRAM__SECRET_TOKEN", "s3cret"),
            ("SALES_FORECAST__TELEGRAM__ENABLED", "false"),
            ("UNRELATED", "ignored"),
        ]),
    )
    .unwrap();

    assert_eq!(settings.model.n_estimators, 50);
    assert_eq!(settings.telegram.secret_token.as_deref(), Some("s3cret"));
    assert!(!settings.telegram.enabled);
}

#[test]
fn test_webhook_url_variable() {
    let settings = Settings::load_with_env(
        "missing.yaml",
        env(&[("WEBHOOK_URL", "https://sales-forecast-bot.onrender.com")]),
    )
    .unwrap();
    assert_eq!(
        settings.webhook.base_url,
        "https://sales-forecast-bot.onrender.com"
    );

    let empty = Settings::load_with_env("missing.yaml", env(&[("WEBHOOK_URL", "")])).unwrap();
    assert_eq!(empty.webhook.base_url, PLACEHOLDER_BASE_URL);
}

#[test]
fn test_non_numeric_port_is_rejected() {
    assert!(Settings::load_with_env("missing.yaml", env(&[("PORT", "http")])).is_err());
}

#[test]
fn test_settings_validation_invalid_port() {
    let mut settings = Settings::default();
    settings.server.port = 0;
    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_model_bounds() {
    let mut settings = Settings::default();
    settings.model.n_estimators = 0;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.model.test_fraction = 1.0;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.model.periods = 1;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.model.max_horizon = 0;
    assert!(settings.validate().is_err());

    let mut settings = Settings::default();
    settings.model.path = "  ".to_string();
    assert!(settings.validate().is_err());
}
