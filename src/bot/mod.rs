//! Chat-bot module - command parsing, reply rendering and Telegram wire types

pub mod commands;
pub mod report;
pub mod telegram;
pub mod url;

pub use commands::Command;
pub use telegram::{SendMessage, Update};
pub use url::WebhookUrl;

use tracing::{error, info};

use crate::error::Result;
use crate::forecast::Forecaster;

/// Horizon of the `/test` command
pub const QUICK_CHECK_DAYS: u32 = 3;

/// Horizon of the `/forecast` command
pub const REPORT_DAYS: u32 = 7;

/// Produce the reply text for `command`.
///
/// Forecasting commands train the model first when it is not ready yet, so
/// this may block for the duration of a training run.
pub fn respond(forecaster: &dyn Forecaster, command: Command) -> String {
    match command {
        Command::Start => report::START_TEXT.to_string(),
        Command::Help => report::HELP_TEXT.to_string(),
        Command::Test => forecast_reply(forecaster, QUICK_CHECK_DAYS, command)
            .map(|records| report::render_quick_check(&records))
            .unwrap_or_else(|e| {
                format!(
                    "❌ Quick check failed: {}\n\nPlease try again in a few moments.",
                    report::escape_markdown(&e.to_string())
                )
            }),
        Command::Forecast => forecast_reply(forecaster, REPORT_DAYS, command)
            .map(|records| report::render_forecast_report(&records))
            .unwrap_or_else(|_| report::FAILURE_TEXT.to_string()),
    }
}

fn forecast_reply(
    forecaster: &dyn Forecaster,
    days: u32,
    command: Command,
) -> Result<Vec<crate::forecast::ForecastRecord>> {
    let result = forecaster
        .ensure_ready()
        .and_then(|_| forecaster.forecast(days));

    match &result {
        Ok(records) => info!(command = command.name(), days = records.len(), "Forecast sent"),
        Err(e) => error!(command = command.name(), error = %e, "Forecast command failed"),
    }
    result
}
