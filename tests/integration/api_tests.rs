//! API endpoint integration tests

use crate::support::*;
use axum::http::StatusCode;
use sales_forecast_bot::{config::PLACEHOLDER_BASE_URL, forecast::Forecaster};
use std::sync::Arc;

#[tokio::test]
async fn test_health_reports_model_state() {
    let forecaster = Arc::new(StubForecaster::new(false));
    let app = app(test_settings(), forecaster.clone());

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "sales-forecast-bot");
    assert_eq!(body["model_ready"], false);

    forecaster.set_ready(true);
    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model_ready"], true);
}

#[tokio::test]
async fn test_health_never_fails_with_broken_model() {
    let app = app(test_settings(), Arc::new(FailingForecaster));

    let (status, body) = get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["model_ready"].is_boolean());
}

#[tokio::test]
async fn test_forecast_returns_requested_days() {
    let app = app(test_settings(), Arc::new(StubForecaster::new(true)));

    let (status, body) = get_json(&app, "/forecast?days=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["days"], 7);
    assert_eq!(body["forecast"].as_array().unwrap().len(), 7);

    let (_, body) = get_json(&app, "/forecast?days=12").await;
    assert_eq!(body["forecast"].as_array().unwrap().len(), 12);
}

#[tokio::test]
async fn test_forecast_defaults_to_seven_days() {
    let app = app(test_settings(), Arc::new(StubForecaster::new(true)));

    let (status, default_body) = get_json(&app, "/forecast").await;
    let (_, explicit_body) = get_json(&app, "/forecast?days=7").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(default_body["days"], 7);
    assert_eq!(default_body, explicit_body);
}

#[tokio::test]
async fn test_forecast_non_integer_days_is_server_error() {
    let app = app(test_settings(), Arc::new(StubForecaster::new(true)));

    for uri in ["/forecast?days=abc", "/forecast?days=", "/forecast?days=1.5"] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().unwrap().contains("not an integer"));
    }
}

#[tokio::test]
async fn test_forecast_before_model_ready_fails() {
    let app = app(test_settings(), Arc::new(StubForecaster::new(false)));

    let (status, body) = get_json(&app, "/forecast?days=3").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("not ready"));
}

#[tokio::test]
async fn test_forecast_collaborator_error_is_message_only() {
    let app = app(test_settings(), Arc::new(FailingForecaster));

    let (status, body) = get_json(&app, "/forecast").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Internal error: regressor diverged");
}

#[tokio::test]
async fn test_forecast_with_trained_random_forest() {
    let dir = tempfile::tempdir().unwrap();
    let forecaster = small_forecaster(&dir);
    forecaster.train().unwrap();
    let app = app(test_settings(), forecaster);

    let (status, body) = get_json(&app, "/forecast?days=7").await;
    assert_eq!(status, StatusCode::OK);

    let records = body["forecast"].as_array().unwrap();
    assert_eq!(records.len(), 7);
    for record in records {
        assert!(record["date"].is_string());
        assert!(record["day_name"].is_string());
        assert!(record["predicted_sales"].as_f64().unwrap() >= 0.0);
    }

    let (status, body) = get_json(&app, "/forecast?days=0").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);

    let (status, _) = get_json(&app, "/forecast?days=-2").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_set_webhook_uses_configured_base() {
    let mut settings = test_settings();
    settings.webhook.base_url = "https://sales-forecast-bot.onrender.com/".to_string();
    let app = app(settings, Arc::new(StubForecaster::new(true)));

    let (status, body) = get_json(&app, "/set_webhook").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "info");

    let url = body["webhook_url"].as_str().unwrap();
    assert_eq!(url, "https://sales-forecast-bot.onrender.com/webhook");
    assert!(body["message"].as_str().unwrap().contains(url));
}

#[tokio::test]
async fn test_set_webhook_defaults_to_placeholder() {
    let app = app(test_settings(), Arc::new(StubForecaster::new(false)));

    let (status, body) = get_json(&app, "/set_webhook").await;
    assert_eq!(status, StatusCode::OK);

    let url = body["webhook_url"].as_str().unwrap();
    assert!(url.starts_with(PLACEHOLDER_BASE_URL));
    assert!(url.ends_with("/webhook"));
}

#[tokio::test]
async fn test_index_is_html() {
    let app = app(test_settings(), Arc::new(StubForecaster::new(false)));

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);

    let html = String::from_utf8(body).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("/forecast"));
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let app = app(test_settings(), Arc::new(StubForecaster::new(false)));

    let (status, body) = get_json(&app, "/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    for path in ["/", "/health", "/forecast", "/set_webhook", "/webhook"] {
        assert!(body["paths"].get(path).is_some(), "missing {path}");
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = app(test_settings(), Arc::new(StubForecaster::new(true)));

    let (status, _) = get(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
