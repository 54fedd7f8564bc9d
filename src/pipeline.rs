//! Transcript ingestion.
//!
//! [`IngestionPipeline`] reads transcript lines, parses them into entries,
//! resolves or creates the owning chat, folds the entry in, and persists both.
//!
//! Error handling per line:
//!
//! | Error | Action |
//! |-------|--------|
//! | [`LineFormat`](SupportError::LineFormat) | log, skip the line, continue |
//! | [`Structural`](SupportError::Structural) | abort the run |
//! | [`Storage`](SupportError::Storage) | abort the run |
//! | [`Consistency`](SupportError::Consistency) | abort the run |
//!
//! # Example
//!
//! ```rust
//! use supportpack::pipeline::IngestionPipeline;
//! use supportpack::store::{MemoryStore, Store};
//!
//! let store = MemoryStore::new();
//! let pipeline = IngestionPipeline::new(&store);
//!
//! let input = "[C1] t\tu\tcustomer\t2020-01-01T10:00:00.000Z\thello\n\
//!              [C1] t\tu\tana\t2020-01-01T11:00:00.000Z\thi there\n";
//! let summary = pipeline.run(input.as_bytes())?;
//!
//! assert_eq!(summary.imported, 2);
//! assert_eq!(store.count_chats()?, 1);
//! # Ok::<(), supportpack::SupportError>(())
//! ```

use std::io::BufRead;

use tracing::{debug, info, warn};

use crate::Entry;
use crate::core::chat::Chat;
use crate::error::{Result, SupportError};
use crate::parser::TextEntryParser;
use crate::store::Store;

/// What happened to a single transcript line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// The entry was folded into its chat and both were stored.
    Imported {
        chat_id: String,
        /// A new chat was created for this entry.
        created: bool,
    },
    /// A support entry referenced a chat that does not exist yet.
    SkippedOrphan { chat_id: String },
}

/// Counters for one import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Lines read from the source.
    pub lines: usize,
    /// Entries folded and stored.
    pub imported: usize,
    /// Chats created during the run.
    pub chats_created: usize,
    /// Lines skipped because they were malformed.
    pub skipped_malformed: usize,
    /// Lines skipped because their chat did not exist and the author was
    /// not the customer.
    pub skipped_orphan: usize,
}

impl ImportSummary {
    /// Total skipped lines.
    pub fn skipped(&self) -> usize {
        self.skipped_malformed + self.skipped_orphan
    }
}

/// Line-at-a-time importer over any [`Store`].
pub struct IngestionPipeline<S> {
    store: S,
    parser: TextEntryParser,
}

impl<S: Store> IngestionPipeline<S> {
    /// Creates a pipeline recognizing the default customer identifier.
    pub fn new(store: S) -> Self {
        Self {
            store,
            parser: TextEntryParser::new(),
        }
    }

    /// Creates a pipeline with a custom line parser.
    pub fn with_parser(store: S, parser: TextEntryParser) -> Self {
        Self { store, parser }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Imports every line of `reader`.
    ///
    /// Malformed lines are logged and skipped. Any other error stops the run
    /// and is returned as-is.
    ///
    /// Lines are split on `\n` with a trailing `\r` removed. Bytes that are
    /// not valid UTF-8 are replaced with `U+FFFD`, which is never a word
    /// character.
    pub fn run<R: BufRead>(&self, reader: R) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();

        for raw in reader.split(b'\n') {
            let mut raw = raw?;
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            let line = String::from_utf8_lossy(&raw);
            summary.lines += 1;

            match self.ingest_line(&line) {
                Ok(LineOutcome::Imported { created, .. }) => {
                    summary.imported += 1;
                    if created {
                        summary.chats_created += 1;
                    }
                }
                Ok(LineOutcome::SkippedOrphan { .. }) => summary.skipped_orphan += 1,
                Err(e) if e.is_recoverable() => {
                    warn!(line = summary.lines, "{}", e);
                    summary.skipped_malformed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        info!(
            lines = summary.lines,
            imported = summary.imported,
            chats_created = summary.chats_created,
            skipped = summary.skipped(),
            "Import finished"
        );
        Ok(summary)
    }

    /// Parses and imports a single transcript line.
    pub fn ingest_line(&self, line: &str) -> Result<LineOutcome> {
        let entry = self.parser.parse(line)?;
        self.ingest_entry(&entry)
    }

    /// Imports an already parsed entry.
    ///
    /// A chat seen for the first time is written together with its first
    /// entry by [`Store::record_fold`]. No empty seed chat is stored on its own.
    pub fn ingest_entry(&self, entry: &Entry) -> Result<LineOutcome> {
        let (mut chat, created) = match self.store.find_chat(&entry.chat_id)? {
            Some(chat) => (chat, false),
            None if entry.is_customer() => {
                debug!(chat_id = %entry.chat_id, "Creating chat");
                (Chat::from_entry(entry), true)
            }
            None => {
                warn!(
                    chat_id = %entry.chat_id,
                    author = %entry.author,
                    "Chat does not exist and author is not the customer, skipping"
                );
                return Ok(LineOutcome::SkippedOrphan {
                    chat_id: entry.chat_id.clone(),
                });
            }
        };

        debug!(title = %entry.title, "Saving entry");
        chat.fold(entry);
        self.store.record_fold(&chat, entry)?;

        Ok(LineOutcome::Imported {
            chat_id: chat.chat_id,
            created,
        })
    }
}

/// Fails with [`SupportError::ChatNotFound`] unless the chat exists.
pub fn require_chat<S: Store>(store: &S, chat_id: &str) -> Result<Chat> {
    store
        .find_chat(chat_id)?
        .ok_or_else(|| SupportError::ChatNotFound(chat_id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, SqliteStore};

    const CUSTOMER_LINE: &str =
        "[C100] A (B) <2020-01-01T10:00:00.000Z>\tu\tcustomer\t2020-01-01T10:00:00.000Z\thello there";
    const SUPPORT_LINE: &str =
        "[C100] A (B) <2020-01-01T10:00:00.000Z>\tu\tana\t2020-01-01T11:00:00.000Z\thi, how can I help?";

    #[test]
    fn test_customer_line_creates_chat() {
        let store = MemoryStore::new();
        let pipeline = IngestionPipeline::new(&store);

        let outcome = pipeline.ingest_line(CUSTOMER_LINE).unwrap();
        assert_eq!(
            outcome,
            LineOutcome::Imported {
                chat_id: "C100".into(),
                created: true
            }
        );
        let chat = store.find_chat("C100").unwrap().unwrap();
        assert_eq!(chat.customer_interactions, 1);
        assert_eq!(store.count_entries().unwrap(), 1);
    }

    #[test]
    fn test_support_line_for_unknown_chat_is_skipped() {
        let store = MemoryStore::new();
        let pipeline = IngestionPipeline::new(&store);

        let outcome = pipeline.ingest_line(SUPPORT_LINE).unwrap();
        assert_eq!(
            outcome,
            LineOutcome::SkippedOrphan {
                chat_id: "C100".into()
            }
        );
        assert_eq!(store.count_chats().unwrap(), 0);
        assert_eq!(store.count_entries().unwrap(), 0);
    }

    #[test]
    fn test_second_line_updates_existing_chat() {
        let store = MemoryStore::new();
        let pipeline = IngestionPipeline::new(&store);
        pipeline.ingest_line(CUSTOMER_LINE).unwrap();

        let outcome = pipeline.ingest_line(SUPPORT_LINE).unwrap();
        assert_eq!(
            outcome,
            LineOutcome::Imported {
                chat_id: "C100".into(),
                created: false
            }
        );

        let chat = store.find_chat("C100").unwrap().unwrap();
        assert_eq!(chat.interactions, 1);
        assert_eq!(chat.customer_interactions, 1);
        assert_eq!(chat.authors, vec!["ana"]);
        assert_eq!(chat.first_response_time, chat.start + 3600);
        assert_eq!(store.count_chats().unwrap(), 1);
        assert_eq!(store.count_entries().unwrap(), 2);
    }

    #[test]
    fn test_run_skips_malformed_lines() {
        let store = MemoryStore::new();
        let pipeline = IngestionPipeline::new(&store);
        let input = format!(
            "{}\nnot enough fields\n[C100] t\tu\tana\tyesterday\tbad time\n\n{}\n",
            CUSTOMER_LINE, SUPPORT_LINE
        );

        let summary = pipeline.run(input.as_bytes()).unwrap();
        assert_eq!(summary.lines, 5);
        assert_eq!(summary.imported, 2);
        assert_eq!(summary.chats_created, 1);
        assert_eq!(summary.skipped_malformed, 3);
        assert_eq!(summary.skipped_orphan, 0);
        assert_eq!(summary.skipped(), 3);
    }

    #[test]
    fn test_run_aborts_on_missing_chat_id() {
        let store = MemoryStore::new();
        let pipeline = IngestionPipeline::new(&store);
        let input = format!(
            "{}\nno bracket\tu\tcustomer\t2020-01-01T10:00:00.000Z\thi\n{}\n",
            CUSTOMER_LINE, SUPPORT_LINE
        );

        let err = pipeline.run(input.as_bytes()).unwrap_err();
        assert!(err.is_structural());
        // The line after the structural error is never reached
        assert_eq!(store.count_entries().unwrap(), 1);
    }

    #[test]
    fn test_run_aborts_on_duplicate_chats() {
        let duplicate = Chat {
            chat_id: "C100".into(),
            ..Chat::default()
        };
        let store = MemoryStore::with_chats(vec![duplicate.clone(), duplicate]);
        let pipeline = IngestionPipeline::new(&store);

        let err = pipeline.run(SUPPORT_LINE.as_bytes()).unwrap_err();
        assert!(err.is_consistency());
    }

    #[test]
    fn test_custom_customer_id() {
        let store = MemoryStore::new();
        let pipeline =
            IngestionPipeline::with_parser(&store, TextEntryParser::with_customer_id("client"));
        let line = "[7] t\tu\tclient\t2020-01-01T10:00:00.000Z\thello";

        assert!(matches!(
            pipeline.ingest_line(line).unwrap(),
            LineOutcome::Imported { created: true, .. }
        ));
        assert_eq!(pipeline.store().count_chats().unwrap(), 1);
    }

    #[test]
    fn test_run_keeps_going_past_invalid_utf8() {
        let store = MemoryStore::new();
        let pipeline = IngestionPipeline::new(&store);
        let mut input = Vec::new();
        input.extend_from_slice(CUSTOMER_LINE.as_bytes());
        input.extend_from_slice(b"\n[C100] t\tu\tana\t2020-01-01T10:30:00.000Z\tcaf\xe9 ok\r\n");
        input.extend_from_slice(b"[C100] t\tu\tbob\t2020-01-01T10:45:00.000Z\tsure\n");

        let summary = pipeline.run(input.as_slice()).unwrap();
        assert_eq!(summary.lines, 3);
        assert_eq!(summary.imported, 3);
        assert_eq!(summary.skipped(), 0);

        let chat = store.find_chat("C100").unwrap().unwrap();
        assert_eq!(chat.authors, vec!["ana", "bob"]);
        // "caf\u{FFFD} ok" is two words, "sure" one
        assert_eq!(chat.support_words, 3);
        assert_eq!(store.entries()[1].reply, "caf\u{FFFD} ok");
    }

    /// Store whose fold writes always fail and that refuses direct inserts.
    struct FailingFold(MemoryStore);

    impl Store for FailingFold {
        fn find_chat(&self, chat_id: &str) -> Result<Option<Chat>> {
            self.0.find_chat(chat_id)
        }
        fn insert_chat(&self, chat: &Chat) -> Result<i64> {
            Err(SupportError::consistency(&chat.chat_id, 2))
        }
        fn upsert_chat(&self, chat: &Chat) -> Result<()> {
            self.0.upsert_chat(chat)
        }
        fn count_chats(&self) -> Result<u64> {
            self.0.count_chats()
        }
        fn all_chats(&self) -> Result<Vec<Chat>> {
            self.0.all_chats()
        }
        fn insert_entry(&self, entry: &Entry) -> Result<i64> {
            self.0.insert_entry(entry)
        }
        fn count_entries(&self) -> Result<u64> {
            self.0.count_entries()
        }
        fn record_fold(&self, _chat: &Chat, entry: &Entry) -> Result<i64> {
            Err(SupportError::consistency(&entry.chat_id, 2))
        }
    }

    #[test]
    fn test_failed_fold_leaves_no_seed_chat() {
        let store = FailingFold(MemoryStore::new());
        let pipeline = IngestionPipeline::new(&store);

        assert!(pipeline.ingest_line(CUSTOMER_LINE).unwrap_err().is_consistency());
        assert_eq!(store.count_chats().unwrap(), 0);
        assert_eq!(store.count_entries().unwrap(), 0);
    }

    #[test]
    fn test_new_chat_gets_id_on_first_write() {
        let store = SqliteStore::in_memory().unwrap();
        let pipeline = IngestionPipeline::new(&store);
        pipeline.ingest_line(CUSTOMER_LINE).unwrap();

        let chat = store.find_chat("C100").unwrap().unwrap();
        assert!(chat.id.is_some());
        assert_eq!(chat.customer_interactions, 1);
        assert_eq!(store.count_entries().unwrap(), 1);
    }

    #[test]
    fn test_require_chat() {
        let store = MemoryStore::new();
        IngestionPipeline::new(&store)
            .ingest_line(CUSTOMER_LINE)
            .unwrap();

        assert_eq!(require_chat(&store, "C100").unwrap().chat_id, "C100");
        assert!(matches!(
            require_chat(&store, "nope").unwrap_err(),
            SupportError::ChatNotFound(_)
        ));
    }
}
