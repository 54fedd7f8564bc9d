//! Support transcript entries.
//!
//! An [`Entry`] is one message line from a support transcript, already split
//! into fields and tagged with the chat it belongs to. Entries are immutable
//! once parsed; all aggregation happens on [`Chat`](crate::core::chat::Chat).
//!
//! # Example
//!
//! ```
//! use supportpack::{Channel, Entry};
//!
//! let entry = Entry::new("C100", "agent", 1_577_872_800, "See https://docs.bitnami.com/x");
//! assert_eq!(entry.channel, Channel::Community);
//! assert!(!entry.is_customer());
//! assert!(entry.has_link());
//! assert!(entry.has_doc_link());
//! assert_eq!(entry.word_count(), 6);
//! ```

use serde::{Deserialize, Serialize};

use crate::core::text;

/// Author value reserved for the customer side of a conversation.
pub const CUSTOMER_ID: &str = "customer";

/// Where a support conversation took place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Community forum thread
    Community,
    /// Zendesk ticket
    #[default]
    Zendesk,
}

impl Channel {
    /// Classifies a chat id. Ids containing an uppercase `C` are community
    /// threads, everything else is a Zendesk ticket.
    pub fn from_chat_id(chat_id: &str) -> Self {
        if chat_id.contains('C') {
            Channel::Community
        } else {
            Channel::Zendesk
        }
    }

    /// Returns the lowercase name used in storage and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Community => "community",
            Channel::Zendesk => "zendesk",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "community" => Ok(Channel::Community),
            "zendesk" => Ok(Channel::Zendesk),
            _ => Err(format!(
                "Unknown channel: '{}'. Expected one of: community, zendesk",
                s
            )),
        }
    }
}

/// One message within a support chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Storage id, assigned when the entry is inserted.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub id: Option<i64>,

    /// Business key of the owning chat, taken from the `[...]` token of the title.
    pub chat_id: String,

    /// Who wrote the message. [`CUSTOMER_ID`] marks the customer.
    pub author: String,

    /// Raw conversation title.
    pub title: String,

    /// Conversation URL.
    pub url: String,

    /// Event time, seconds since the Unix epoch.
    pub timestamp: i64,

    /// Message body.
    pub reply: String,

    /// Channel derived from `chat_id`.
    pub channel: Channel,

    #[serde(skip)]
    customer_id: Option<String>,
}

impl Entry {
    /// Creates an entry with empty title and URL. The channel is derived from
    /// `chat_id`.
    pub fn new(
        chat_id: impl Into<String>,
        author: impl Into<String>,
        timestamp: i64,
        reply: impl Into<String>,
    ) -> Self {
        let chat_id = chat_id.into();
        Self {
            id: None,
            channel: Channel::from_chat_id(&chat_id),
            chat_id,
            author: author.into(),
            title: String::new(),
            url: String::new(),
            timestamp,
            reply: reply.into(),
            customer_id: None,
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Sets the conversation title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the conversation URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Overrides the author value that identifies the customer.
    #[must_use]
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        let customer_id = customer_id.into();
        self.customer_id = (customer_id != CUSTOMER_ID).then_some(customer_id);
        self
    }

    // =========================================================================
    // Derived predicates
    // =========================================================================

    /// Returns `true` if the author is the customer (exact match).
    pub fn is_customer(&self) -> bool {
        self.author == self.customer_id.as_deref().unwrap_or(CUSTOMER_ID)
    }

    /// Number of words in the reply.
    pub fn word_count(&self) -> usize {
        text::word_count(&self.reply)
    }

    /// Returns `true` if the reply contains an `https://` link.
    pub fn has_link(&self) -> bool {
        text::has_link(&self.reply)
    }

    /// Returns `true` if the reply points to the documentation site.
    pub fn has_doc_link(&self) -> bool {
        text::has_doc_link(&self.reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_chat_id() {
        assert_eq!(Channel::from_chat_id("C100"), Channel::Community);
        assert_eq!(Channel::from_chat_id("12C"), Channel::Community);
        assert_eq!(Channel::from_chat_id("c100"), Channel::Zendesk);
        assert_eq!(Channel::from_chat_id("4521"), Channel::Zendesk);
        assert_eq!(Channel::from_chat_id(""), Channel::Zendesk);
    }

    #[test]
    fn test_channel_round_trip_str() {
        assert_eq!("community".parse::<Channel>().unwrap(), Channel::Community);
        assert_eq!(Channel::Zendesk.to_string(), "zendesk");
        assert!("Community".parse::<Channel>().is_err());
    }

    #[test]
    fn test_is_customer_exact_match() {
        assert!(Entry::new("1", "customer", 0, "").is_customer());
        assert!(!Entry::new("1", "Customer", 0, "").is_customer());
        assert!(!Entry::new("1", "customer ", 0, "").is_customer());
        assert!(!Entry::new("1", "jota", 0, "").is_customer());
    }

    #[test]
    fn test_custom_customer_id() {
        let entry = Entry::new("1", "client", 0, "").with_customer_id("client");
        assert!(entry.is_customer());

        let entry = Entry::new("1", "customer", 0, "").with_customer_id("client");
        assert!(!entry.is_customer());
    }

    #[test]
    fn test_entry_predicates() {
        let entry = Entry::new("1", "agent", 0, "hello, world!!");
        assert_eq!(entry.word_count(), 2);
        assert!(!entry.has_link());
        assert!(!entry.has_doc_link());
    }

    #[test]
    fn test_entry_serde_skips_missing_id() {
        let entry = Entry::new("C1", "agent", 10, "hi");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("\"id\""));
        assert!(json.contains("\"channel\":\"community\""));
    }
}
