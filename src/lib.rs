//! # Supportpack
//!
//! A Rust library and CLI for turning support-chat transcripts into
//! per-conversation analytics.
//!
//! ## Overview
//!
//! Supportpack reads tab-separated transcript lines, groups the messages into
//! chats, keeps running statistics per chat in a document store, and emits a
//! CSV report with elapsed time, working-day response latency,
//! word/interaction ratios and a support-level classification.
//!
//! Transcript lines can arrive in any order. All aggregation compares entry
//! timestamps, so the earliest support reply is found no matter when it was
//! imported.
//!
//! ## Quick Start
//!
//! ```rust
//! use supportpack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let store = SqliteStore::in_memory()?;
//!     let pipeline = IngestionPipeline::new(&store);
//!
//!     pipeline.run(
//!         "[C100] Login\tu\tcustomer\t2020-01-01T10:00:00.000Z\thello there\n\
//!          [C100] Login\tu\tana\t2020-01-01T12:00:00.000Z\thi, on it\n"
//!             .as_bytes(),
//!     )?;
//!
//!     let report = to_report_csv(&store.all_chats()?)?;
//!     assert!(report.contains(",level1\n"));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`parser`] - [`TextEntryParser`](parser::TextEntryParser), TSV line to [`Entry`]
//! - [`entry`] - [`Entry`] and [`Channel`]
//! - [`core`] - Chat aggregate, metrics, report rows and CSV writers
//! - [`store`] - [`Store`](store::Store) trait with SQLite and in-memory implementations
//! - [`pipeline`] - [`IngestionPipeline`](pipeline::IngestionPipeline)
//! - [`config`] - [`SupportConfig`](config::SupportConfig)
//! - [`cli`] - Command-line definitions (feature `cli`)
//! - [`error`] - [`SupportError`] and [`Result`]

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod entry;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod store;

// Re-export the main types at the crate root for convenience
pub use entry::{Channel, Entry};
pub use error::{Result, SupportError};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use supportpack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{Channel, Entry};

    pub use crate::error::{Result, SupportError};

    pub use crate::config::SupportConfig;

    pub use crate::core::{Chat, ChatMetrics, ReportRow, SupportLevel};

    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_report_csv, write_report};

    pub use crate::parser::TextEntryParser;

    pub use crate::pipeline::{ImportSummary, IngestionPipeline, LineOutcome};

    pub use crate::store::{MemoryStore, SqliteStore, Store};
}
