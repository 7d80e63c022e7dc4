//! HTTP route definitions

use crate::api::models::*;
use crate::api::{handlers, webhook_handlers};
use crate::error::ErrorBody;
use crate::forecast::ForecastRecord;
use axum::{
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Sales Forecast Bot API",
        description = "Sales forecasts from a random-forest model, plus a chat-bot webhook.",
        license(name = "MIT"),
    ),
    servers(
        (url = "http://localhost:5000", description = "Local development server")
    ),
    paths(
        handlers::index,
        handlers::health_check,
        handlers::forecast,
        handlers::set_webhook,
        webhook_handlers::telegram_webhook,
    ),
    components(schemas(
        HealthResponse,
        ForecastResponse,
        ForecastRecord,
        WebhookInfoResponse,
        ErrorBody,
    )),
    tags(
        (name = "Info", description = "Landing page"),
        (name = "Health", description = "Health and model status"),
        (name = "Forecast", description = "Sales forecasting"),
        (name = "Webhook", description = "Chat-bot webhook"),
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Create the main application router
pub fn create_router(state: Arc<crate::AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        // Health check endpoint
        .route("/health", get(handlers::health_check))
        .route("/forecast", get(handlers::forecast))
        // Informational only, registers nothing
        .route("/set_webhook", get(handlers::set_webhook))
        .route("/webhook", post(webhook_handlers::telegram_webhook))
        .route("/api-docs/openapi.json", get(openapi_json))
        // Add shared state
        .with_state(state)
        // Add tracing layer
        .layer(TraceLayer::new_for_http())
}
