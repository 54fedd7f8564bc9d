//! Derived per-chat metrics used by the report.
//!
//! All calendar arithmetic happens in UTC on the stored epoch seconds.

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use serde::{Deserialize, Serialize};

use super::chat::Chat;

const SECS_PER_HOUR: i64 = 60 * 60;

/// Total word count above which a chat is considered level 3.
pub const LEVEL3_WORDS: u64 = 1000;
/// Total interaction count above which a chat is considered level 3.
pub const LEVEL3_INTERACTIONS: u32 = 10;
/// Total word count below which a chat is considered level 1.
pub const LEVEL1_WORDS: u64 = 200;
/// Total interaction count below which a chat is considered level 1.
pub const LEVEL1_INTERACTIONS: u32 = 3;

/// Coarse classification of how demanding a conversation was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportLevel {
    Level1,
    Level2,
    Level3,
}

impl SupportLevel {
    /// Classifies a conversation by its total words and interactions.
    ///
    /// The level 1 thresholds are checked last and win over level 3, so a
    /// chat with 20 interactions but only 150 words is level 1.
    pub fn classify(total_words: u64, total_interactions: u32) -> Self {
        let mut level = SupportLevel::Level2;
        if total_words > LEVEL3_WORDS || total_interactions > LEVEL3_INTERACTIONS {
            level = SupportLevel::Level3;
        }
        if total_words < LEVEL1_WORDS || total_interactions < LEVEL1_INTERACTIONS {
            level = SupportLevel::Level1;
        }
        level
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SupportLevel::Level1 => "level1",
            SupportLevel::Level2 => "level2",
            SupportLevel::Level3 => "level3",
        }
    }
}

impl std::fmt::Display for SupportLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts epoch seconds to a UTC instant.
///
/// Values outside chrono's representable range clamp to the epoch.
pub fn to_datetime(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_default()
}

/// Moves a weekend start forward to the next Monday's midnight.
///
/// Saturday starts jump 48 hours and Sunday starts 24 hours, then truncate to
/// midnight. Weekday starts are returned untouched.
pub fn working_day_start(start: i64) -> i64 {
    let start_time = to_datetime(start);
    let shift = match start_time.weekday() {
        Weekday::Sat => Duration::hours(48),
        Weekday::Sun => Duration::hours(24),
        _ => return start,
    };

    (start_time + shift)
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc().timestamp())
        .unwrap_or(start)
}

/// Whole hours from the working-day-adjusted `start` to `end`, truncating.
///
/// # Example
///
/// ```rust
/// use supportpack::core::metrics::hours_lapse_working_days;
///
/// // Saturday 2020-01-04 10:00 UTC -> Monday 2020-01-06 10:00 UTC
/// let saturday = 1_578_132_000;
/// let monday = saturday + 48 * 3600;
/// assert_eq!(hours_lapse_working_days(saturday, monday), 10);
/// ```
pub fn hours_lapse_working_days(start: i64, end: i64) -> i64 {
    (end - working_day_start(start)) / SECS_PER_HOUR
}

/// Metrics derived from a [`Chat`] for one report row.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatMetrics {
    /// Hours between first and last entry, truncating.
    pub elapsed_hours: i64,
    /// Working-day hours until the first support reply, or `-1`.
    pub time_to_first_hours: i64,
    pub total_interactions: u32,
    /// Support replies per customer message. Not finite when the customer
    /// never wrote.
    pub interaction_ratio: f64,
    /// Support words per customer word. Not finite when the customer wrote
    /// no words.
    pub word_ratio: f64,
    pub total_words: u64,
    pub support_level: SupportLevel,
}

impl ChatMetrics {
    /// Computes the metrics of a chat.
    pub fn compute(chat: &Chat) -> Self {
        let time_to_first_hours = if chat.first_response_time < chat.start {
            -1
        } else {
            hours_lapse_working_days(chat.start, chat.first_response_time)
        };

        let total_interactions = chat.interactions + chat.customer_interactions;
        let total_words = chat.support_words + chat.customer_words;

        Self {
            elapsed_hours: (chat.end - chat.start) / SECS_PER_HOUR,
            time_to_first_hours,
            total_interactions,
            interaction_ratio: f64::from(chat.interactions)
                / f64::from(chat.customer_interactions),
            word_ratio: chat.support_words as f64 / chat.customer_words as f64,
            total_words,
            support_level: SupportLevel::classify(total_words, total_interactions),
        }
    }
}
