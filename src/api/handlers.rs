//! HTTP request handlers

use crate::api::models::{
    parse_days, ForecastResponse, HealthResponse, WebhookInfoResponse, SERVICE_NAME,
};
use crate::error::ErrorBody;
use crate::AppState;
use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Json,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

const INDEX_HTML: &str = include_str!("index.html");

/// Landing page
#[utoipa::path(
    get,
    path = "/",
    tag = "Info",
    responses((status = 200, description = "Informational HTML page", body = String, content_type = "text/html"))
)]
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is live", body = HealthResponse))
)]
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        model_ready: state.forecaster.is_ready(),
    })
}

/// Sales forecast for the next `days` days
#[utoipa::path(
    get,
    path = "/forecast",
    tag = "Forecast",
    params(("days" = Option<i64>, Query, description = "Forecast horizon in days (default 7)")),
    responses(
        (status = 200, description = "Forecast produced", body = ForecastResponse),
        (status = 500, description = "Forecast failed", body = ErrorBody),
    )
)]
pub async fn forecast(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    // Parsed here rather than by an extractor so a bad query is a forecast failure, not a 400
    let params = match Query::<HashMap<String, String>>::try_from_uri(&uri) {
        Ok(Query(params)) => params,
        Err(rejection) => return forecast_failure(uri.query(), rejection.body_text()),
    };
    let raw_days = params.get("days").map(String::as_str);

    let result = parse_days(raw_days).and_then(|days| {
        state
            .forecaster
            .forecast(days)
            .map(|records| (days, records))
            .map_err(|e| e.to_string())
    });

    match result {
        Ok((days, forecast)) => {
            info!(days, "Forecast served");
            Json(ForecastResponse {
                success: true,
                days,
                forecast,
            })
            .into_response()
        }
        Err(message) => forecast_failure(raw_days, message),
    }
}

fn forecast_failure(days: Option<&str>, message: String) -> Response {
    warn!(days = ?days, error = %message, "Forecast failed");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(message))).into_response()
}

/// Describe the webhook address. Does not register it with the messaging platform.
#[utoipa::path(
    get,
    path = "/set_webhook",
    tag = "Webhook",
    responses((status = 200, description = "Webhook address", body = WebhookInfoResponse))
)]
pub async fn set_webhook(State(state): State<Arc<AppState>>) -> Json<WebhookInfoResponse> {
    let webhook_url = state.webhook_url.endpoint();

    let mut message = format!(
        "Configure your bot's webhook to {}. This endpoint does not register it; \
         call the platform's setWebhook method yourself.",
        webhook_url
    );
    if state.webhook_url.is_placeholder() {
        message.push_str(" WEBHOOK_URL is not set, so a placeholder base URL is shown.");
    }

    Json(WebhookInfoResponse {
        status: "info".to_string(),
        message,
        webhook_url,
    })
}
