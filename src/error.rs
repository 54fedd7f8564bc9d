//! Unified error types for supportpack.
//!
//! This module provides a single [`SupportError`] enum that covers every
//! failure in the import/report pipeline. Variants fall into two groups:
//!
//! - **Recoverable**: a single transcript line is malformed. The pipeline logs
//!   it and moves on to the next line.
//! - **Fatal**: the input format itself is wrong, the store failed, or the
//!   store broke its one-chat-per-id guarantee. The run stops.
//!
//! Use [`SupportError::is_recoverable`] to decide between the two.

use std::io;

use thiserror::Error;

/// A specialized [`Result`] type for supportpack operations.
///
/// # Example
///
/// ```rust
/// use supportpack::error::Result;
/// use supportpack::Entry;
///
/// fn load() -> Result<Vec<Entry>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, SupportError>;

/// The error type for all supportpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SupportError {
    /// An I/O error occurred (input file missing, unreadable, stdout closed).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A transcript line could not be turned into an entry.
    ///
    /// Raised for lines with fewer than five tab-separated fields and for
    /// unparsable timestamps. Recoverable: the line is skipped.
    #[error("Malformed line ({reason}): {line}")]
    LineFormat {
        /// What was wrong with the line
        reason: String,
        /// The offending line, verbatim
        line: String,
    },

    /// The entry title carries no `[chat-id]` token.
    ///
    /// This means the input is not a support transcript at all, so the run
    /// aborts instead of skipping.
    #[error("Could not extract chat id from title '{title}'")]
    Structural {
        /// The title that was missing the bracketed id
        title: String,
    },

    /// The backing store failed.
    #[error("Storage error while {context}: {source}")]
    Storage {
        /// What the store was doing
        context: String,
        /// The underlying driver error
        #[source]
        source: rusqlite::Error,
    },

    /// More than one chat record exists for a single chat id.
    #[error("Found {count} chat records for chat id '{chat_id}', expected at most one")]
    Consistency {
        /// The duplicated business key
        chat_id: String,
        /// How many records were found
        count: usize,
    },

    /// No chat record exists for the requested chat id.
    #[error("No chat found with id '{0}'")]
    ChatNotFound(String),

    /// JSON encoding/decoding of a stored column failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV report writing failed.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl SupportError {
    /// Creates a malformed-line error.
    pub fn line_format(reason: impl Into<String>, line: impl Into<String>) -> Self {
        SupportError::LineFormat {
            reason: reason.into(),
            line: line.into(),
        }
    }

    /// Creates a missing-chat-id error.
    pub fn structural(title: impl Into<String>) -> Self {
        SupportError::Structural {
            title: title.into(),
        }
    }

    /// Wraps a driver error with a description of the failed operation.
    pub fn storage(context: impl Into<String>, source: rusqlite::Error) -> Self {
        SupportError::Storage {
            context: context.into(),
            source,
        }
    }

    /// Creates a duplicate-chat error.
    pub fn consistency(chat_id: impl Into<String>, count: usize) -> Self {
        SupportError::Consistency {
            chat_id: chat_id.into(),
            count,
        }
    }

    /// Returns `true` if the pipeline may skip the offending line and continue.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SupportError::LineFormat { .. })
    }

    /// Returns `true` if this is a malformed-line error.
    pub fn is_line_format(&self) -> bool {
        matches!(self, SupportError::LineFormat { .. })
    }

    /// Returns `true` if this is a missing-chat-id error.
    pub fn is_structural(&self) -> bool {
        matches!(self, SupportError::Structural { .. })
    }

    /// Returns `true` if this is a storage error.
    pub fn is_storage(&self) -> bool {
        matches!(self, SupportError::Storage { .. })
    }

    /// Returns `true` if this is a duplicate-chat error.
    pub fn is_consistency(&self) -> bool {
        matches!(self, SupportError::Consistency { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================
