//! API request and response models

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::forecast::ForecastRecord;

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "sales-forecast-bot";

/// Horizon used when `/forecast` is called without `days`
pub const DEFAULT_FORECAST_DAYS: u32 = 7;

/// Health check response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Always "healthy" while the process serves requests
    pub status: String,
    pub service: String,
    /// Whether the forecasting model has been trained or loaded
    pub model_ready: bool,
}

/// Successful forecast response
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ForecastResponse {
    pub success: bool,
    /// Number of days forecast
    pub days: u32,
    /// One record per day, in date order starting tomorrow
    pub forecast: Vec<ForecastRecord>,
}

/// Informational webhook response. Nothing is registered with the messaging platform.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct WebhookInfoResponse {
    pub status: String,
    pub message: String,
    pub webhook_url: String,
}

/// Parse the raw `days` query value, falling back to [`DEFAULT_FORECAST_DAYS`].
///
/// Out-of-range values are left to the forecaster, which knows its horizon.
pub fn parse_days(raw: Option<&str>) -> Result<u32, String> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_FORECAST_DAYS);
    };

    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid literal for days: '{}' is not an integer", raw))?;

    u32::try_from(value).map_err(|_| format!("days must be a positive integer, got {}", value))
}
