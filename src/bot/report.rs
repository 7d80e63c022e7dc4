//! Markdown texts sent back to chat users

use crate::forecast::ForecastRecord;

pub const START_TEXT: &str = "\
🏪 *Welcome to the Sales Forecast Bot!*

I use machine learning to predict your sales! 📊

*Available commands:*
/start - Show this message
/forecast - 7-day sales forecast 📈
/test - Quick system check ⚡
/help - Detailed help ❓

_Powered by a random forest model_";

pub const HELP_TEXT: &str = "\
📊 *USER GUIDE*

*Commands:*
🔹 /forecast (or /previsao) - Sales forecast for the next 7 days, with:
  • Totals and daily average
  • Best and worst day
  • Day-by-day detail

🔹 /test (or /teste) - Quick check (3 days)

🔹 /start - Restart the conversation

*How it works:*
A random forest learns weekly and monthly patterns from historical sales and projects them forward.

💡 _Tip: run /forecast every Monday to plan your week!_";

pub const FAILURE_TEXT: &str = "\
❌ Sorry, the forecast could not be generated right now.

Please try again in a few moments.";

/// Aggregate figures over a forecast horizon
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastSummary<'a> {
    pub total: f64,
    pub mean: f64,
    pub best: &'a ForecastRecord,
    pub worst: &'a ForecastRecord,
}

impl<'a> ForecastSummary<'a> {
    /// `None` for an empty forecast. Ties resolve to the earliest day.
    pub fn from_records(records: &'a [ForecastRecord]) -> Option<Self> {
        let first = records.first()?;
        let mut best = first;
        let mut worst = first;
        for record in records {
            if record.predicted_sales > best.predicted_sales {
                best = record;
            }
            if record.predicted_sales < worst.predicted_sales {
                worst = record;
            }
        }

        let total: f64 = records.iter().map(|r| r.predicted_sales).sum();
        Some(Self {
            total,
            mean: total / records.len() as f64,
            best,
            worst,
        })
    }
}

/// Format an amount with thousands separators and two decimals, e.g. `2,345.60`
pub fn format_money(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{}{}.{:02}", sign, grouped, cents % 100)
}

/// Escape the characters that are markup in Telegram's legacy Markdown mode
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '_' | '*' | '`' | '[') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn day_line(marker: &str, record: &ForecastRecord) -> String {
    let short: String = record.day_name.chars().take(3).collect();
    format!(
        "{} {} ({}): R$ {}\n",
        marker,
        record.date.format("%d/%m"),
        short,
        format_money(record.predicted_sales)
    )
}

/// Short listing used by the `/test` command
pub fn render_quick_check(records: &[ForecastRecord]) -> String {
    let mut text = format!(
        "✅ *Bot is up and running!*\n\n📊 *Model check ({} days):*\n\n",
        records.len()
    );
    for record in records {
        text.push_str(&day_line("📅", record));
    }
    text.push_str("\n✨ _System operational!_");
    text
}

/// Full report used by the `/forecast` command
pub fn render_forecast_report(records: &[ForecastRecord]) -> String {
    let Some(summary) = ForecastSummary::from_records(records) else {
        return FAILURE_TEXT.to_string();
    };

    let mut text = format!(
        "📈 *SALES FORECAST - {days} DAYS*\n\n\
         💰 *Summary:*\n\
         • Expected total: R$ {total}\n\
         • Daily average: R$ {mean}\n\n\
         🏆 *Best day:*\n\
         • {best_date} ({best_name})\n\
         • Sales: R$ {best_sales}\n\n\
         ⚠️ *Weakest day:*\n\
         • {worst_date} ({worst_name})\n\
         • Sales: R$ {worst_sales}\n\n\
         📋 *Daily detail:*\n",
        days = records.len(),
        total = format_money(summary.total),
        mean = format_money(summary.mean),
        best_date = summary.best.date.format("%d/%m/%Y"),
        best_name = summary.best.day_name,
        best_sales = format_money(summary.best.predicted_sales),
        worst_date = summary.worst.date.format("%d/%m/%Y"),
        worst_name = summary.worst.day_name,
        worst_sales = format_money(summary.worst.predicted_sales),
    );

    for record in records {
        let marker = if std::ptr::eq(record, summary.best) {
            "🟢"
        } else if std::ptr::eq(record, summary.worst) {
            "🔴"
        } else {
            "🔵"
        };
        text.push_str(&day_line(marker, record));
    }

    text.push_str("\n💡 _Use these numbers to plan stock and staffing!_");
    text
}
