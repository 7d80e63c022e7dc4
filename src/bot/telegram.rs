//! Subset of the Telegram Bot API wire format used by the webhook

use serde::{Deserialize, Serialize};

/// Header Telegram sets when the webhook was registered with a secret token
pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub edited_message: Option<Message>,
}

impl Update {
    /// The message carried by this update, edited or not
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref().or(self.edited_message.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// `sendMessage` call returned as the webhook response body.
///
/// Telegram executes a method contained in the reply to a webhook request,
/// so answering a command needs no outbound API call.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessage {
    pub method: &'static str,
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: &'static str,
}

impl SendMessage {
    pub fn markdown(chat_id: i64, text: String) -> Self {
        Self {
            method: "sendMessage",
            chat_id,
            text,
            parse_mode: "Markdown",
        }
    }
}
