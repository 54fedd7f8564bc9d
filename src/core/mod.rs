//! Core aggregation and reporting logic.
//!
//! This module contains:
//! - [`text`] - Word counting and link detection on reply bodies
//! - [`chat`] - The [`Chat`] aggregate and its entry fold
//! - [`metrics`] - Derived per-chat metrics (working-day latency, ratios, support level)
//! - [`report`] - Report rows and column formatting
//! - [`output`] - CSV report writers
//!
//! # Quick Start
//!
//! ```rust
//! use supportpack::core::{Chat, ChatMetrics, SupportLevel};
//! use supportpack::Entry;
//!
//! let question = Entry::new("C1", "customer", 1_577_872_800, "my app is down");
//! let mut chat = Chat::from_entry(&question);
//! chat.fold(&question);
//! chat.fold(&Entry::new("C1", "ana", 1_577_876_400, "restarting it now"));
//!
//! let metrics = ChatMetrics::compute(&chat);
//! assert_eq!(metrics.time_to_first_hours, 1);
//! assert_eq!(metrics.support_level, SupportLevel::Level1);
//! ```

pub mod chat;
pub mod metrics;
pub mod output;
pub mod report;
pub mod text;

// Re-export main types for convenience
pub use chat::Chat;
pub use metrics::{ChatMetrics, SupportLevel, hours_lapse_working_days};
pub use report::{REPORT_HEADER, ReportRow};

#[cfg(feature = "csv-output")]
pub use output::{to_report_csv, write_report, write_report_file};
