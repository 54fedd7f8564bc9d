//! Report writers.
//!
//! - [`write_report`] - stream the chat report to any [`std::io::Write`]
//! - [`write_report_file`] - write the chat report to a file
//! - [`to_report_csv`] - render the chat report to a `String`
//!
//! All three require the `csv-output` feature.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(feature = "csv-output")]
//! # fn main() -> supportpack::Result<()> {
//! use supportpack::core::Chat;
//! use supportpack::core::output::to_report_csv;
//!
//! let csv = to_report_csv(&[Chat::default()])?;
//! assert!(csv.starts_with("id,url,date,month,"));
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "csv-output"))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_report_csv, write_report, write_report_file};
