//! Forecasting module - the model behind every prediction the service serves
//!
//! The HTTP and bot layers only see the [`Forecaster`] trait; the concrete
//! [`SalesForecaster`] trains a random forest on calendar features of a
//! synthetic sales history and persists it as JSON.

pub mod features;
pub mod forest;
pub mod history;
pub mod metrics;
pub mod sales;
pub mod tree;

pub use sales::{ModelSource, SalesForecaster};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::Result;

/// Predicted sales for one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ForecastRecord {
    #[schema(value_type = String, format = Date, example = "2026-10-20")]
    pub date: NaiveDate,
    pub predicted_sales: f64,
    /// English weekday name, e.g. "Tuesday"
    pub day_name: String,
}

impl ForecastRecord {
    pub fn new(date: NaiveDate, predicted_sales: f64) -> Self {
        Self {
            date,
            predicted_sales,
            day_name: date.format("%A").to_string(),
        }
    }
}

/// Outcome of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingReport {
    pub train_samples: usize,
    pub test_samples: usize,
    pub mae: f64,
    pub rmse: f64,
    pub n_estimators: usize,
    pub trained_at: DateTime<Utc>,
}

/// A component able to train itself and produce day-by-day sales forecasts.
///
/// Implementations are shared across request handlers, so every method takes
/// `&self` and must be safe to call concurrently.
pub trait Forecaster: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &str;

    /// Whether a trained model is available
    fn is_ready(&self) -> bool;

    /// Train (or retrain) the model. Blocking and CPU-bound.
    fn train(&self) -> Result<TrainingReport>;

    /// Forecast the next `days` days, starting tomorrow
    fn forecast(&self, days: u32) -> Result<Vec<ForecastRecord>>;

    /// Train only if no model is available yet
    fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            self.train().map(|_| ())
        }
    }
}
