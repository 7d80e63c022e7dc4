//! Service settings and configuration management

use crate::error::{AppError, Result};
use config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default location of the optional YAML settings file
pub const DEFAULT_CONFIG_PATH: &str = "config/service.yaml";

/// Environment variable that points at an alternative settings file
pub const CONFIG_PATH_ENV: &str = "SALES_FORECAST_CONFIG";

/// Prefix for structured environment overrides (`SALES_FORECAST__SERVER__PORT`)
pub const ENV_PREFIX: &str = "SALES_FORECAST";

/// Placeholder used when no public base URL has been configured
pub const PLACEHOLDER_BASE_URL: &str = "https://your-app.onrender.com";

/// Upper bound accepted for `model.max_horizon` (about ten years)
pub const MAX_FORECAST_HORIZON: u32 = 3650;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Settings {
    pub server: ServerConfig,
    pub webhook: WebhookConfig,
    pub telegram: TelegramConfig,
    pub model: ModelConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Public URL the messaging platform would call back on
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    PLACEHOLDER_BASE_URL.to_string()
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Chat-bot webhook configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Expected value of the `X-Telegram-Bot-Api-Secret-Token` header
    #[serde(default)]
    pub secret_token: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            secret_token: None,
        }
    }
}

/// Forecasting model configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    /// Where the trained model is persisted
    #[serde(default = "default_model_path")]
    pub path: String,
    #[serde(default = "default_true")]
    pub persist: bool,
    /// Days of synthetic history to train on
    #[serde(default = "default_periods")]
    pub periods: usize,
    #[serde(default = "default_n_estimators")]
    pub n_estimators: usize,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Largest horizon a single forecast may request
    #[serde(default = "default_max_horizon")]
    pub max_horizon: u32,
}

fn default_model_path() -> String {
    "sales_model.json".to_string()
}

fn default_periods() -> usize {
    365
}

fn default_n_estimators() -> usize {
    100
}

fn default_max_depth() -> usize {
    10
}

fn default_min_samples_split() -> usize {
    2
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}

fn default_max_horizon() -> u32 {
    365
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            persist: true,
            periods: default_periods(),
            n_estimators: default_n_estimators(),
            max_depth: default_max_depth(),
            min_samples_split: default_min_samples_split(),
            test_fraction: default_test_fraction(),
            seed: default_seed(),
            max_horizon: default_max_horizon(),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Pretty,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl Settings {
    /// Load settings from the settings file and the process environment
    pub fn load() -> Result<Self> {
        let env: Map<String, String> = std::env::vars().collect();
        let path = env
            .get(CONFIG_PATH_ENV)
            .cloned()
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
        Self::load_with_env(path, env)
    }

    /// Load settings from a specific file and an explicit environment snapshot.
    ///
    /// Precedence, lowest first: built-in defaults, the YAML/TOML file (if it
    /// exists), `SALES_FORECAST__*` variables, then the bare `PORT` and
    /// `WEBHOOK_URL` variables used by PaaS hosts.
    pub fn load_with_env<P: AsRef<Path>>(path: P, env: Map<String, String>) -> Result<Self> {
        let path = path.as_ref();

        let format = if path
            .extension()
            .map_or(false, |ext| ext == "yaml" || ext == "yml")
        {
            FileFormat::Yaml
        } else {
            FileFormat::Toml
        };

        let port = env.get("PORT").cloned();
        let webhook_url = env.get("WEBHOOK_URL").cloned().filter(|u| !u.is_empty());

        let mut builder = Config::builder()
            .set_default("server.host", default_host())?
            .set_default("server.port", i64::from(default_port()))?
            .set_default("webhook.base_url", default_base_url())?
            .set_default("logging.level", default_log_level())?;

        if path.exists() {
            builder = builder.add_source(File::from(path).format(format));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .source(Some(env)),
            )
            .set_override_option("server.port", port)?
            .set_override_option("webhook.base_url", webhook_url)?
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }

        if self.webhook.base_url.trim().is_empty() {
            return Err(invalid("Webhook base URL cannot be empty"));
        }

        let model = &self.model;
        if model.path.trim().is_empty() {
            return Err(invalid("Model path cannot be empty"));
        }
        if model.n_estimators == 0 {
            return Err(invalid("Model must have at least one estimator"));
        }
        if model.max_depth == 0 {
            return Err(invalid("Model max_depth must be at least 1"));
        }
        if model.min_samples_split < 2 {
            return Err(invalid("Model min_samples_split must be at least 2"));
        }
        if !(model.test_fraction > 0.0 && model.test_fraction < 1.0) {
            return Err(invalid("Model test_fraction must be between 0 and 1"));
        }
        let test_len = (model.periods as f64 * model.test_fraction).ceil() as usize;
        if model.periods < 2 || test_len >= model.periods {
            return Err(invalid(format!(
                "Model periods ({}) too small to hold out {:.0}% for evaluation",
                model.periods,
                model.test_fraction * 100.0
            )));
        }
        if model.max_horizon == 0 || model.max_horizon > MAX_FORECAST_HORIZON {
            return Err(invalid(format!(
                "Model max_horizon must be between 1 and {}",
                MAX_FORECAST_HORIZON
            )));
        }

        Ok(())
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn invalid(message: impl Into<String>) -> AppError {
    AppError::Config(config::ConfigError::Message(message.into()))
}
