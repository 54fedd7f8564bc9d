//! Per-chat report rows.
//!
//! [`ReportRow`] turns a [`Chat`] and its [`ChatMetrics`] into the exact
//! column values of the chat report. Writing rows out is handled by
//! [`core::output`](super::output).

use super::chat::Chat;
use super::metrics::{ChatMetrics, to_datetime};

/// Column names of the chat report, in order.
pub const REPORT_HEADER: [&str; 18] = [
    "id",
    "url",
    "date",
    "month",
    "elapse_time(hours)",
    "time_to_first(hours)",
    "interactions(total)",
    "customer_interactions",
    "support_interactions",
    "interaction_ratio",
    "word_ratio",
    "user_last",
    "person",
    "channel",
    "withlink",
    "withlinktodoc",
    "totalword",
    "support_level",
];

/// chrono format of the `date` column.
pub const DATE_FORMAT: &str = "%m/%d/%Y";
/// chrono format of the `month` column.
pub const MONTH_FORMAT: &str = "%m/%Y";

/// Placeholder for `person` when nobody from support replied.
pub const NO_AUTHOR: &str = "none";

/// One rendered row of the chat report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    fields: Vec<String>,
}

impl ReportRow {
    /// Builds the report row for `chat`.
    pub fn from_chat(chat: &Chat) -> Self {
        let metrics = ChatMetrics::compute(chat);
        let start = to_datetime(chat.start);

        let fields = vec![
            chat.chat_id.clone(),
            chat.url.clone(),
            start.format(DATE_FORMAT).to_string(),
            start.format(MONTH_FORMAT).to_string(),
            metrics.elapsed_hours.to_string(),
            metrics.time_to_first_hours.to_string(),
            metrics.total_interactions.to_string(),
            chat.customer_interactions.to_string(),
            chat.interactions.to_string(),
            format_ratio(metrics.interaction_ratio),
            format_ratio(metrics.word_ratio),
            format_flag(chat.customer_last_responder),
            chat.last_author().unwrap_or(NO_AUTHOR).to_string(),
            chat.channel.to_string(),
            format_flag(chat.responded_with_link),
            format_flag(chat.responded_with_doc),
            metrics.total_words.to_string(),
            metrics.support_level.to_string(),
        ];

        Self { fields }
    }

    /// Column values in header order.
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Value of the named column.
    pub fn get(&self, column: &str) -> Option<&str> {
        REPORT_HEADER
            .iter()
            .position(|&name| name == column)
            .and_then(|idx| self.fields.get(idx))
            .map(String::as_str)
    }

    /// The row as a single comma-joined line, without quoting.
    pub fn to_line(&self) -> String {
        self.fields.join(",")
    }
}

/// Renders a ratio with two decimals. Non-finite values render as `+Inf`,
/// `-Inf` or `NaN` instead of failing.
pub fn format_ratio(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        }
    } else {
        format!("{:.2}", value)
    }
}

/// Renders a boolean as `1` or `0`.
pub fn format_flag(value: bool) -> String {
    if value { "1" } else { "0" }.to_string()
}
