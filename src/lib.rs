//! Sales Forecast Bot
//!
//! A small web service that serves sales forecasts from a random-forest model
//! and answers chat-bot commands delivered through a webhook.

pub mod api;
pub mod bot;
pub mod config;
pub mod error;
pub mod forecast;

pub use error::{AppError, Result};

use std::sync::Arc;
use tracing::{error, info};

use bot::WebhookUrl;
use forecast::{Forecaster, ModelSource, SalesForecaster};

/// Application state shared across all handlers
pub struct AppState {
    pub settings: Arc<config::Settings>,
    pub forecaster: Arc<dyn Forecaster>,
    pub webhook_url: WebhookUrl,
}

impl AppState {
    pub fn new(settings: config::Settings, forecaster: Arc<dyn Forecaster>) -> Self {
        let webhook_url = WebhookUrl::new(&settings.webhook.base_url);
        Self {
            settings: Arc::new(settings),
            forecaster,
            webhook_url,
        }
    }
}

/// Load or train the model once before serving.
///
/// Failures are logged and leave the forecaster untrained; the service then
/// runs degraded rather than refusing to start. Returns whether a model is ready.
pub async fn warm_up(forecaster: Arc<SalesForecaster>) -> bool {
    info!(forecaster = forecaster.name(), "Initializing forecasting model");

    let task = tokio::task::spawn_blocking({
        let forecaster = forecaster.clone();
        move || forecaster.initialize()
    });

    match task.await {
        Ok(Ok(source)) => {
            let origin = match &source {
                ModelSource::Loaded(_) => "loaded",
                ModelSource::Trained(_) => "trained",
            };
            let report = source.report();
            info!(
                origin,
                mae = report.mae,
                rmse = report.rmse,
                "Forecasting model ready"
            );
            true
        }
        Ok(Err(e)) => {
            error!(error = %e, "Model initialization failed, starting degraded");
            false
        }
        Err(e) => {
            error!(error = %e, "Model initialization task aborted, starting degraded");
            false
        }
    }
}
