//! SQLite schema for the `chats` and `entries` collections.

use rusqlite::Connection;
use tracing::info;

use crate::error::{Result, SupportError};

/// Creates the tables and indexes if they do not exist yet.
///
/// The unique index on `chats.chat_id` is what keeps one chat per
/// conversation.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS chats (
            id                      INTEGER PRIMARY KEY AUTOINCREMENT,
            chat_id                 TEXT NOT NULL,
            authors                 TEXT NOT NULL DEFAULT '[]',
            title                   TEXT NOT NULL DEFAULT '',
            url                     TEXT NOT NULL DEFAULT '',
            start_time              INTEGER NOT NULL,
            end_time                INTEGER NOT NULL,
            first_response_time     INTEGER NOT NULL DEFAULT 0,
            interactions_support    INTEGER NOT NULL DEFAULT 0,
            interactions_customer   INTEGER NOT NULL DEFAULT 0,
            customer_words          INTEGER NOT NULL DEFAULT 0,
            support_words           INTEGER NOT NULL DEFAULT 0,
            customer_last           INTEGER NOT NULL DEFAULT 0,
            channel                 TEXT NOT NULL
                                    CHECK (channel IN ('community', 'zendesk')),
            has_link                INTEGER NOT NULL DEFAULT 0,
            has_doc                 INTEGER NOT NULL DEFAULT 0
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_chats_chat_id
            ON chats (chat_id);

        CREATE TABLE IF NOT EXISTS entries (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            chat_id     TEXT NOT NULL,
            author      TEXT NOT NULL,
            title       TEXT NOT NULL DEFAULT '',
            url         TEXT NOT NULL DEFAULT '',
            timestamp   INTEGER NOT NULL,
            reply       TEXT NOT NULL DEFAULT '',
            channel     TEXT NOT NULL
                        CHECK (channel IN ('community', 'zendesk'))
        );

        CREATE INDEX IF NOT EXISTS idx_entries_chat_id
            ON entries (chat_id, timestamp ASC);
        ",
    )
    .map_err(|e| SupportError::storage("creating schema", e))?;

    info!("Schema ready");
    Ok(())
}
