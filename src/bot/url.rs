//! Webhook URL construction

use crate::config::PLACEHOLDER_BASE_URL;

/// Path the messaging platform posts updates to
pub const WEBHOOK_PATH: &str = "/webhook";

/// Public webhook address derived from the service's base URL
#[derive(Debug, Clone)]
pub struct WebhookUrl {
    base: String,
}

impl WebhookUrl {
    pub fn new(base: impl AsRef<str>) -> Self {
        // Base must not end with a slash so the path joins cleanly
        let base = base.as_ref().trim().trim_end_matches('/').to_string();
        Self { base }
    }

    /// Full URL the platform should call, `<base>/webhook`
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base, WEBHOOK_PATH)
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Whether the base is still the built-in placeholder
    pub fn is_placeholder(&self) -> bool {
        self.base == PLACEHOLDER_BASE_URL
    }
}

impl Default for WebhookUrl {
    fn default() -> Self {
        Self::new(PLACEHOLDER_BASE_URL)
    }
}
