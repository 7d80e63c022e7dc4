//! Unit tests for the sales forecaster

use chrono::{Datelike, Duration, NaiveDate};
use sales_forecast_bot::config::ModelConfig;
use sales_forecast_bot::forecast::{
    history::{generate_sample_history, history_start, HistoryShape},
    Forecaster, SalesForecaster,
};

fn forecaster(dir: &tempfile::TempDir) -> SalesForecaster {
    SalesForecaster::new(ModelConfig {
        path: dir.path().join("model.json").to_string_lossy().into_owned(),
        n_estimators: 15,
        ..Default::default()
    })
}

#[test]
fn test_forecast_count_matches_requested_days() {
    let dir = tempfile::tempdir().unwrap();
    let forecaster = forecaster(&dir);
    forecaster.train().unwrap();

    for days in [1, 3, 7, 30] {
        assert_eq!(forecaster.forecast(days).unwrap().len(), days as usize);
    }
}

#[test]
fn test_forecast_starts_tomorrow() {
    let dir = tempfile::tempdir().unwrap();
    let forecaster = forecaster(&dir);
    forecaster.train().unwrap();

    let tomorrow = chrono::Utc::now().date_naive() + Duration::days(1);
    let forecast = forecaster.forecast(2).unwrap();
    // Allow for the clock crossing midnight between the two calls
    assert!(forecast[0].date == tomorrow || forecast[0].date == tomorrow + Duration::days(1));
    assert_eq!(forecast[1].date, forecast[0].date + Duration::days(1));
}

#[test]
fn test_model_learns_weekly_pattern() {
    let dir = tempfile::tempdir().unwrap();
    let forecaster = forecaster(&dir);
    forecaster.train().unwrap();

    // Weekly seasonality peaks on Wednesday and bottoms out on Saturday
    let start = NaiveDate::from_ymd_opt(2022, 6, 6).unwrap();
    assert_eq!(start.weekday(), chrono::Weekday::Mon);
    let week = forecaster.forecast_from(start, 7).unwrap();

    let wednesday = week[2].predicted_sales;
    let saturday = week[5].predicted_sales;
    assert!(wednesday > saturday, "wednesday={wednesday} saturday={saturday}");
}

#[test]
fn test_training_on_custom_history() {
    let dir = tempfile::tempdir().unwrap();
    let forecaster = forecaster(&dir);

    let shape = HistoryShape {
        trend_start: 200.0,
        trend_end: 200.0,
        weekly_amplitude: 0.0,
        monthly_amplitude: 0.0,
        noise_std: 0.0,
    };
    let history = generate_sample_history(history_start(), 100, shape, 1).unwrap();
    let report = forecaster.train_on(&history).unwrap();

    assert_eq!(report.test_samples, 20);
    assert!(report.mae.abs() < 1e-9);

    let forecast = forecaster
        .forecast_from(NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(), 5)
        .unwrap();
    assert!(forecast
        .iter()
        .all(|r| (r.predicted_sales - 200.0).abs() < 1e-9));
}

#[test]
fn test_too_little_history_fails() {
    let dir = tempfile::tempdir().unwrap();
    let forecaster = forecaster(&dir);

    let history =
        generate_sample_history(history_start(), 1, HistoryShape::default(), 1).unwrap();
    assert!(forecaster.train_on(&history).is_err());
    assert!(!forecaster.is_ready());
}
