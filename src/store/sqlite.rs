//! SQLite-backed [`Store`].
//!
//! Wraps a single rusqlite `Connection` in a `Mutex`. Every store operation
//! locks the connection for its own duration only; the two writes of one
//! ingested line run inside a single transaction.

use std::path::Path;
use std::sync::{Mutex, PoisonError};

use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, Row, params};
use tracing::info;

use super::Store;
use super::schema::init_schema;
use crate::core::chat::Chat;
use crate::error::{Result, SupportError};
use crate::{Channel, Entry};

const CHAT_COLUMNS: &str = "id, chat_id, authors, title, url, start_time, end_time, \
     first_response_time, interactions_support, interactions_customer, customer_words, \
     support_words, customer_last, channel, has_link, has_doc";

/// Column list and placeholders shared by plain insert and upsert.
macro_rules! insert_chat_sql {
    () => {
        "INSERT INTO chats (chat_id, authors, title, url, start_time, end_time,
             first_response_time, interactions_support, interactions_customer, customer_words,
             support_words, customer_last, channel, has_link, has_doc)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"
    };
}

const INSERT_CHAT: &str = insert_chat_sql!();

const UPSERT_CHAT: &str = concat!(
    insert_chat_sql!(),
    "
     ON CONFLICT (chat_id) DO UPDATE SET
         authors = excluded.authors,
         title = excluded.title,
         url = excluded.url,
         start_time = excluded.start_time,
         end_time = excluded.end_time,
         first_response_time = excluded.first_response_time,
         interactions_support = excluded.interactions_support,
         interactions_customer = excluded.interactions_customer,
         customer_words = excluded.customer_words,
         support_words = excluded.support_words,
         customer_last = excluded.customer_last,
         channel = excluded.channel,
         has_link = excluded.has_link,
         has_doc = excluded.has_doc"
);

const INSERT_ENTRY: &str = "INSERT INTO entries (chat_id, author, title, url, timestamp, reply, channel)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";

/// Bound parameters of a chat row, in `INSERT` column order.
macro_rules! chat_params {
    ($chat:expr, $authors:expr) => {
        params![
            $chat.chat_id,
            $authors,
            $chat.title,
            $chat.url,
            $chat.start,
            $chat.end,
            $chat.first_response_time,
            i64::from($chat.interactions),
            i64::from($chat.customer_interactions),
            $chat.customer_words as i64,
            $chat.support_words as i64,
            $chat.customer_last_responder,
            $chat.channel.as_str(),
            $chat.responded_with_link,
            $chat.responded_with_doc,
        ]
    };
}

/// SQLite document store for chats and entries.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) a database file and makes sure the schema exists.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)
            .map_err(|e| SupportError::storage(format!("opening {}", path.display()), e))?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )
        .map_err(|e| SupportError::storage("setting pragmas", e))?;

        info!("Database opened at {}", path.display());
        Self::with_connection(conn)
    }

    /// Opens an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SupportError::storage("opening in-memory database", e))?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Runs a closure with exclusive access to the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T>,
    {
        let mut conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut conn)
    }

    fn count(&self, table: &'static str) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                    row.get(0)
                })
                .map_err(|e| SupportError::storage(format!("counting {}", table), e))?;
            Ok(count as u64)
        })
    }
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore").finish()
    }
}

impl Store for SqliteStore {
    fn find_chat(&self, chat_id: &str) -> Result<Option<Chat>> {
        self.with_conn(|conn| {
            let context = || format!("looking up chat {}", chat_id);
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {} FROM chats WHERE chat_id = ?1",
                    CHAT_COLUMNS
                ))
                .map_err(|e| SupportError::storage(context(), e))?;

            let mut chats = stmt
                .query_map(params![chat_id], row_to_chat)
                .map_err(|e| SupportError::storage(context(), e))?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| SupportError::storage(context(), e))?;

            match chats.len() {
                0 => Ok(None),
                1 => Ok(chats.pop()),
                n => Err(SupportError::consistency(chat_id, n)),
            }
        })
    }

    fn insert_chat(&self, chat: &Chat) -> Result<i64> {
        self.with_conn(|conn| {
            let authors = serde_json::to_string(&chat.authors)?;
            conn.execute(INSERT_CHAT, chat_params!(chat, authors))
                .map_err(|e| match e {
                    // Only the unique chat_id index can reject a chat row
                    rusqlite::Error::SqliteFailure(ref err, _)
                        if err.code == ErrorCode::ConstraintViolation =>
                    {
                        SupportError::consistency(&chat.chat_id, 2)
                    }
                    e => SupportError::storage(format!("inserting chat {}", chat.chat_id), e),
                })?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn upsert_chat(&self, chat: &Chat) -> Result<()> {
        self.with_conn(|conn| upsert_chat(conn, chat))
    }

    fn count_chats(&self) -> Result<u64> {
        self.count("chats")
    }

    fn all_chats(&self) -> Result<Vec<Chat>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {} FROM chats ORDER BY id ASC", CHAT_COLUMNS))
                .map_err(|e| SupportError::storage("listing chats", e))?;

            stmt.query_map([], row_to_chat)
                .map_err(|e| SupportError::storage("listing chats", e))?
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| SupportError::storage("reading chats", e))
        })
    }

    fn insert_entry(&self, entry: &Entry) -> Result<i64> {
        self.with_conn(|conn| insert_entry(conn, entry))
    }

    fn count_entries(&self) -> Result<u64> {
        self.count("entries")
    }

    fn record_fold(&self, chat: &Chat, entry: &Entry) -> Result<i64> {
        self.with_conn(|conn| {
            let tx = conn
                .transaction()
                .map_err(|e| SupportError::storage("starting transaction", e))?;
            upsert_chat(&tx, chat)?;
            let id = insert_entry(&tx, entry)?;
            tx.commit()
                .map_err(|e| SupportError::storage(format!("committing chat {}", chat.chat_id), e))?;
            Ok(id)
        })
    }
}

fn upsert_chat(conn: &Connection, chat: &Chat) -> Result<()> {
    let authors = serde_json::to_string(&chat.authors)?;
    conn.execute(UPSERT_CHAT, chat_params!(chat, authors))
        .map_err(|e| SupportError::storage(format!("updating chat {}", chat.chat_id), e))?;
    Ok(())
}

fn insert_entry(conn: &Connection, entry: &Entry) -> Result<i64> {
    conn.execute(
        INSERT_ENTRY,
        params![
            entry.chat_id,
            entry.author,
            entry.title,
            entry.url,
            entry.timestamp,
            entry.reply,
            entry.channel.as_str(),
        ],
    )
    .map_err(|e| SupportError::storage(format!("inserting entry for chat {}", entry.chat_id), e))?;
    Ok(conn.last_insert_rowid())
}

fn row_to_chat(row: &Row<'_>) -> rusqlite::Result<Chat> {
    let authors: String = row.get(2)?;
    let authors = serde_json::from_str(&authors)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
    let channel: String = row.get(13)?;
    let channel = channel.parse::<Channel>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            13,
            Type::Text,
            Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, e)),
        )
    })?;

    Ok(Chat {
        id: Some(row.get(0)?),
        chat_id: row.get(1)?,
        authors,
        title: row.get(3)?,
        url: row.get(4)?,
        start: row.get(5)?,
        end: row.get(6)?,
        first_response_time: row.get(7)?,
        interactions: row.get(8)?,
        customer_interactions: row.get(9)?,
        customer_words: row.get::<_, i64>(10)? as u64,
        support_words: row.get::<_, i64>(11)? as u64,
        customer_last_responder: row.get(12)?,
        channel,
        responded_with_link: row.get(14)?,
        responded_with_doc: row.get(15)?,
    })
}
