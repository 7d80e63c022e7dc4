//! Calendar features fed to the regressor

use chrono::{Datelike, NaiveDate};
use std::f64::consts::PI;

/// Feature column names, in the order [`calendar_features`] emits them
pub const FEATURE_NAMES: [&str; 6] = [
    "day_sin",
    "day_cos",
    "month_sin",
    "month_cos",
    "day_of_month",
    "week_of_year",
];

pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Encode a date as cyclic weekday/month components plus day of month and ISO week
pub fn calendar_features(date: NaiveDate) -> Vec<f64> {
    let day_of_week = date.weekday().num_days_from_monday() as f64;
    let month = date.month() as f64;

    vec![
        (2.0 * PI * day_of_week / 7.0).sin(),
        (2.0 * PI * day_of_week / 7.0).cos(),
        (2.0 * PI * month / 12.0).sin(),
        (2.0 * PI * month / 12.0).cos(),
        date.day() as f64,
        date.iso_week().week() as f64,
    ]
}
