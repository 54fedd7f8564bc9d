//! In-process [`Store`] keeping chats and entries in vectors.

use std::sync::{Mutex, MutexGuard, PoisonError};

use super::Store;
use crate::Entry;
use crate::core::chat::Chat;
use crate::error::{Result, SupportError};

#[derive(Debug, Default)]
struct Collections {
    chats: Vec<Chat>,
    entries: Vec<Entry>,
    next_chat_id: i64,
    next_entry_id: i64,
}

/// Store backed by plain vectors. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store preloaded with chats, bypassing the uniqueness check.
    ///
    /// Lets callers reproduce a store whose one-chat-per-id guarantee was
    /// already broken.
    pub fn with_chats(chats: Vec<Chat>) -> Self {
        let next_chat_id = chats.len() as i64;
        Self {
            inner: Mutex::new(Collections {
                chats,
                next_chat_id,
                ..Collections::default()
            }),
        }
    }

    /// Snapshot of all stored entries, in insertion order.
    pub fn entries(&self) -> Vec<Entry> {
        self.lock().entries.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Collections> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn find_chat(&self, chat_id: &str) -> Result<Option<Chat>> {
        let inner = self.lock();
        let mut matches = inner.chats.iter().filter(|c| c.chat_id == chat_id);
        let first = matches.next().cloned();
        let extra = matches.count();
        if extra > 0 {
            return Err(SupportError::consistency(chat_id, extra + 1));
        }
        Ok(first)
    }

    fn insert_chat(&self, chat: &Chat) -> Result<i64> {
        let mut inner = self.lock();
        let existing = inner
            .chats
            .iter()
            .filter(|c| c.chat_id == chat.chat_id)
            .count();
        if existing > 0 {
            return Err(SupportError::consistency(&chat.chat_id, existing + 1));
        }

        inner.next_chat_id += 1;
        let id = inner.next_chat_id;
        inner.chats.push(Chat {
            id: Some(id),
            ..chat.clone()
        });
        Ok(id)
    }

    fn upsert_chat(&self, chat: &Chat) -> Result<()> {
        let mut inner = self.lock();
        if let Some(stored) = inner.chats.iter_mut().find(|c| c.chat_id == chat.chat_id) {
            let id = stored.id;
            *stored = Chat {
                id,
                ..chat.clone()
            };
            return Ok(());
        }

        inner.next_chat_id += 1;
        let id = inner.next_chat_id;
        inner.chats.push(Chat {
            id: Some(id),
            ..chat.clone()
        });
        Ok(())
    }

    fn count_chats(&self) -> Result<u64> {
        Ok(self.lock().chats.len() as u64)
    }

    fn all_chats(&self) -> Result<Vec<Chat>> {
        Ok(self.lock().chats.clone())
    }

    fn insert_entry(&self, entry: &Entry) -> Result<i64> {
        let mut inner = self.lock();
        inner.next_entry_id += 1;
        let id = inner.next_entry_id;
        let mut stored = entry.clone();
        stored.id = Some(id);
        inner.entries.push(stored);
        Ok(id)
    }

    fn count_entries(&self) -> Result<u64> {
        Ok(self.lock().entries.len() as u64)
    }
}
