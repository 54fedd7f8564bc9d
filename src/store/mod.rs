//! Persistence for chats and entries.
//!
//! The pipeline and report only talk to the [`Store`] trait. Two
//! implementations ship with the crate:
//!
//! - [`SqliteStore`] - SQLite-backed, used by the CLI
//! - [`MemoryStore`] - in-process, for tests and embedding
//!
//! A store holds two collections, `chats` and `entries`, and guarantees at
//! most one chat per `chat_id`. Finding more than one is reported as
//! [`SupportError::Consistency`](crate::SupportError::Consistency).

mod memory;
mod schema;
mod sqlite;

pub use memory::MemoryStore;
pub use schema::init_schema;
pub use sqlite::SqliteStore;

use crate::Entry;
use crate::core::chat::Chat;
use crate::error::Result;

/// Document store holding chat aggregates and raw entries.
pub trait Store {
    /// Looks up the chat with the given business key.
    fn find_chat(&self, chat_id: &str) -> Result<Option<Chat>>;

    /// Inserts a new chat and returns its storage id.
    fn insert_chat(&self, chat: &Chat) -> Result<i64>;

    /// Inserts or replaces the chat with the same `chat_id`.
    fn upsert_chat(&self, chat: &Chat) -> Result<()>;

    /// Number of stored chats.
    fn count_chats(&self) -> Result<u64>;

    /// All chats in insertion order.
    fn all_chats(&self) -> Result<Vec<Chat>>;

    /// Inserts an entry and returns its storage id.
    fn insert_entry(&self, entry: &Entry) -> Result<i64>;

    /// Number of stored entries.
    fn count_entries(&self) -> Result<u64>;

    /// Persists the outcome of folding `entry` into `chat`.
    ///
    /// Both writes belong to one ingested line. Implementations that support
    /// transactions apply them atomically.
    fn record_fold(&self, chat: &Chat, entry: &Entry) -> Result<i64> {
        self.upsert_chat(chat)?;
        self.insert_entry(entry)
    }
}

impl<S: Store + ?Sized> Store for &S {
    fn find_chat(&self, chat_id: &str) -> Result<Option<Chat>> {
        (**self).find_chat(chat_id)
    }

    fn insert_chat(&self, chat: &Chat) -> Result<i64> {
        (**self).insert_chat(chat)
    }

    fn upsert_chat(&self, chat: &Chat) -> Result<()> {
        (**self).upsert_chat(chat)
    }

    fn count_chats(&self) -> Result<u64> {
        (**self).count_chats()
    }

    fn all_chats(&self) -> Result<Vec<Chat>> {
        (**self).all_chats()
    }

    fn insert_entry(&self, entry: &Entry) -> Result<i64> {
        (**self).insert_entry(entry)
    }

    fn count_entries(&self) -> Result<u64> {
        (**self).count_entries()
    }

    fn record_fold(&self, chat: &Chat, entry: &Entry) -> Result<i64> {
        (**self).record_fold(chat, entry)
    }
}
