//! Chat-bot webhook handler

use crate::bot::{self, telegram::SECRET_TOKEN_HEADER, Command, SendMessage, Update};
use crate::error::AppError;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Receive a Telegram update and answer recognised commands inline
#[utoipa::path(
    post,
    path = "/webhook",
    tag = "Webhook",
    request_body(content = String, description = "Telegram Update object", content_type = "application/json"),
    responses(
        (status = 200, description = "sendMessage payload, or {} when there is nothing to answer"),
        (status = 400, description = "Malformed update"),
        (status = 401, description = "Secret token mismatch"),
        (status = 404, description = "Chat bot disabled"),
    )
)]
pub async fn telegram_webhook(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let telegram = &state.settings.telegram;
    if !telegram.enabled {
        return Err(AppError::NotFound("chat bot is disabled".to_string()));
    }

    if let Some(expected) = telegram.secret_token.as_deref() {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok());
        if provided != Some(expected) {
            return Err(AppError::Unauthorized("invalid webhook secret token".to_string()));
        }
    }

    let update: Update = serde_json::from_slice(&body)
        .map_err(|e| AppError::InvalidRequest(format!("malformed update: {}", e)))?;

    let Some(message) = update.message() else {
        debug!(update_id = update.update_id, "Update without message ignored");
        return Ok(Json(serde_json::json!({})).into_response());
    };

    let Some(command) = message.text.as_deref().and_then(Command::parse) else {
        debug!(update_id = update.update_id, "Message without command ignored");
        return Ok(Json(serde_json::json!({})).into_response());
    };

    let chat_id = message.chat.id;
    info!(
        command = command.name(),
        chat_id,
        user_id = ?message.from.as_ref().map(|u| u.id),
        "Bot command received"
    );

    let forecaster = state.forecaster.clone();
    let text = tokio::task::spawn_blocking(move || bot::respond(forecaster.as_ref(), command))
        .await
        .map_err(|e| AppError::Internal(format!("command task failed: {}", e)))?;

    Ok(Json(SendMessage::markdown(chat_id, text)).into_response())
}
