//! Chat aggregates and the entry fold.
//!
//! A [`Chat`] accumulates running statistics for one conversation. Entries
//! can arrive in any order, so every comparison in [`Chat::fold`] uses the
//! entry's own timestamp, never the order in which entries were folded.

use serde::{Deserialize, Serialize};

use crate::{Channel, Entry};

/// Aggregate statistics of one support conversation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Chat {
    /// Storage id, assigned when the chat is first inserted.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub id: Option<i64>,

    /// Business key shared by all entries of this conversation.
    pub chat_id: String,

    /// Distinct support authors, in the order they first replied.
    pub authors: Vec<String>,

    pub title: String,
    pub url: String,

    /// Earliest entry timestamp seen (epoch seconds).
    pub start: i64,
    /// Latest entry timestamp seen (epoch seconds).
    pub end: i64,

    /// Earliest support reply timestamp; `0` while nobody has answered.
    pub first_response_time: i64,

    /// Number of support replies.
    pub interactions: u32,
    pub customer_interactions: u32,
    pub customer_words: u64,
    pub support_words: u64,

    /// Whether the latest entry seen so far came from the customer.
    pub customer_last_responder: bool,

    pub channel: Channel,

    /// Some support reply contained an `https://` link.
    pub responded_with_link: bool,
    /// Some support reply pointed to the documentation site.
    pub responded_with_doc: bool,
}

impl Chat {
    /// Seeds a new chat from the first entry of a conversation.
    ///
    /// Only identity fields are copied and `start`/`end` are set to the
    /// entry's timestamp. Counters stay at zero until the entry is folded.
    pub fn from_entry(entry: &Entry) -> Self {
        Self {
            chat_id: entry.chat_id.clone(),
            title: entry.title.clone(),
            url: entry.url.clone(),
            start: entry.timestamp,
            end: entry.timestamp,
            channel: entry.channel,
            ..Self::default()
        }
    }

    /// Folds one entry into the running statistics.
    ///
    /// # Example
    ///
    /// ```rust
    /// use supportpack::core::Chat;
    /// use supportpack::Entry;
    ///
    /// let question = Entry::new("C1", "customer", 2_000, "it broke");
    /// let answer = Entry::new("C1", "agent", 1_000, "fixed");
    ///
    /// let mut chat = Chat::from_entry(&question);
    /// chat.fold(&question);
    /// chat.fold(&answer);
    ///
    /// assert_eq!(chat.start, 1_000);
    /// assert_eq!(chat.end, 2_000);
    /// assert_eq!(chat.first_response_time, 1_000);
    /// ```
    pub fn fold(&mut self, entry: &Entry) {
        let ts = entry.timestamp;

        if ts < self.start {
            self.start = ts;
        }
        if ts > self.end {
            self.end = ts;
            self.customer_last_responder = entry.is_customer();
        }

        let words = entry.word_count() as u64;
        if entry.is_customer() {
            self.customer_interactions += 1;
            self.customer_words += words;
            return;
        }

        self.support_words += words;
        self.interactions += 1;
        self.add_author(&entry.author);

        if self.first_response_time == 0 || ts < self.first_response_time {
            self.first_response_time = ts;
        }
        if !self.responded_with_link {
            self.responded_with_link = entry.has_link();
        }
        if !self.responded_with_doc {
            self.responded_with_doc = entry.has_doc_link();
        }
    }

    /// Returns `true` once at least one support reply has been folded.
    pub fn has_response(&self) -> bool {
        self.first_response_time != 0
    }

    /// Most recently added support author.
    pub fn last_author(&self) -> Option<&str> {
        self.authors.last().map(String::as_str)
    }

    fn add_author(&mut self, author: &str) {
        if !self.authors.iter().any(|a| a == author) {
            self.authors.push(author.to_string());
        }
    }
}
