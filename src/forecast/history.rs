//! Synthetic sales history used to train the model when no real data is supplied

use chrono::{Datelike, Duration, NaiveDate};
use rand::{rngs::StdRng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::{AppError, Result};

/// One day of observed sales
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalesObservation {
    pub date: NaiveDate,
    pub sales: f64,
}

/// Components of the synthetic demand curve
#[derive(Debug, Clone, Copy)]
pub struct HistoryShape {
    pub trend_start: f64,
    pub trend_end: f64,
    pub weekly_amplitude: f64,
    pub monthly_amplitude: f64,
    pub noise_std: f64,
}

impl Default for HistoryShape {
    fn default() -> Self {
        Self {
            trend_start: 100.0,
            trend_end: 500.0,
            weekly_amplitude: 50.0,
            monthly_amplitude: 30.0,
            noise_std: 20.0,
        }
    }
}

/// First day of the generated history
pub fn history_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 1).expect("2022-01-01 is a valid calendar date")
}

/// Generate `periods` consecutive days of sales with a linear trend, weekly
/// and monthly seasonality, and gaussian noise. Sales never go negative.
pub fn generate_sample_history(
    start: NaiveDate,
    periods: usize,
    shape: HistoryShape,
    seed: u64,
) -> Result<Vec<SalesObservation>> {
    let noise = Normal::new(0.0, shape.noise_std)
        .map_err(|e| AppError::Training(format!("Invalid noise distribution: {}", e)))?;
    let mut rng = StdRng::seed_from_u64(seed);

    let step = if periods > 1 {
        (shape.trend_end - shape.trend_start) / (periods - 1) as f64
    } else {
        0.0
    };

    let history = (0..periods)
        .map(|i| {
            let date = start + Duration::days(i as i64);
            let day_of_week = date.weekday().num_days_from_monday() as f64;
            let day_of_month = date.day() as f64;

            let trend = shape.trend_start + step * i as f64;
            let weekly = shape.weekly_amplitude * (2.0 * PI * day_of_week / 7.0).sin();
            let monthly = shape.monthly_amplitude * (2.0 * PI * day_of_month / 30.0).sin();
            let sales = (trend + weekly + monthly + noise.sample(&mut rng)).max(0.0);

            SalesObservation { date, sales }
        })
        .collect();

    Ok(history)
}
