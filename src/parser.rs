//! Tab-separated transcript line parser.
//!
//! Each transcript line carries at least five tab-separated fields:
//!
//! | Index | Field |
//! |-------|-------|
//! | 0 | title, containing a `[chat-id]` token |
//! | 1 | conversation URL |
//! | 2 | author (`customer` for the customer side) |
//! | 3 | timestamp, `YYYY-MM-DDTHH:MM:SS.sssZ` |
//! | 4.. | reply body; extra tabs are folded into single spaces |
//!
//! # Example
//!
//! ```rust
//! use supportpack::parser::TextEntryParser;
//!
//! let parser = TextEntryParser::new();
//! let entry = parser
//!     .parse("[C100] Login issue\thttps://x/1\tcustomer\t2020-01-01T10:00:00.000Z\thello there")
//!     .unwrap();
//!
//! assert_eq!(entry.chat_id, "C100");
//! assert!(entry.is_customer());
//! assert_eq!(entry.timestamp, 1_577_872_800);
//! ```

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::Entry;
use crate::entry::CUSTOMER_ID;
use crate::error::{Result, SupportError};

/// Minimum number of tab-separated fields in a transcript line.
pub const MIN_FIELDS: usize = 5;

/// chrono format for transcript timestamps. The fractional part is optional.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// First bracketed token of a title, shortest match.
static CHAT_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.*?)\]").expect("chat id pattern is a valid regex"));

/// Parser turning raw transcript lines into [`Entry`] values.
#[derive(Debug, Clone)]
pub struct TextEntryParser {
    customer_id: String,
}

impl TextEntryParser {
    /// Creates a parser that recognizes the default customer identifier.
    pub fn new() -> Self {
        Self {
            customer_id: CUSTOMER_ID.to_string(),
        }
    }

    /// Creates a parser that tags entries with a custom customer identifier.
    pub fn with_customer_id(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
        }
    }

    /// Returns the author value treated as the customer.
    pub fn customer_id(&self) -> &str {
        &self.customer_id
    }

    /// Parses one transcript line.
    ///
    /// # Errors
    ///
    /// - [`SupportError::LineFormat`] if the line has fewer than
    ///   [`MIN_FIELDS`] fields or the timestamp does not parse.
    /// - [`SupportError::Structural`] if the title has no `[chat-id]` token.
    pub fn parse(&self, line: &str) -> Result<Entry> {
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < MIN_FIELDS {
            return Err(SupportError::line_format(
                format!(
                    "expected at least {} tab-separated fields, got {}",
                    MIN_FIELDS,
                    fields.len()
                ),
                line,
            ));
        }

        let title = fields[0];
        let chat_id = extract_chat_id(title).ok_or_else(|| SupportError::structural(title))?;
        let timestamp = parse_timestamp(fields[3])
            .map_err(|e| SupportError::line_format(format!("bad timestamp: {}", e), line))?;

        Ok(Entry::new(chat_id, fields[2].trim(), timestamp, fields[4..].join(" "))
            .with_title(title)
            .with_url(fields[1].trim())
            .with_customer_id(self.customer_id.as_str()))
    }
}

impl Default for TextEntryParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the text inside the first `[...]` of `title`.
pub fn extract_chat_id(title: &str) -> Option<&str> {
    CHAT_ID_PATTERN
        .captures(title)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Parses a transcript timestamp into whole seconds since the epoch (UTC).
pub fn parse_timestamp(raw: &str) -> std::result::Result<i64, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map(|dt| dt.and_utc().timestamp())
}
