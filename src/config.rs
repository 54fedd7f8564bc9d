//! Run configuration.
//!
//! [`SupportConfig`] gathers the few knobs of an import/report run. It has no
//! CLI framework dependency; the binary fills it from command-line flags and
//! environment variables.
//!
//! # Example
//!
//! ```rust
//! use supportpack::config::SupportConfig;
//!
//! let config = SupportConfig::new()
//!     .with_database("data/support.db")
//!     .with_input("transcripts.tsv");
//!
//! assert_eq!(config.customer_id, "customer");
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::entry::CUSTOMER_ID;

/// Default transcript file read by `import`.
pub const DEFAULT_INPUT: &str = "support.tsv";

/// Default SQLite database file.
pub const DEFAULT_DATABASE: &str = "support.db";

/// Configuration for import and report runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportConfig {
    /// SQLite database file (default: `support.db`)
    pub database: PathBuf,

    /// Transcript file read by `import` (default: `support.tsv`)
    pub input: PathBuf,

    /// Author value identifying the customer (default: `customer`)
    pub customer_id: String,
}

impl Default for SupportConfig {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE),
            input: PathBuf::from(DEFAULT_INPUT),
            customer_id: CUSTOMER_ID.to_string(),
        }
    }
}

impl SupportConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the database file.
    #[must_use]
    pub fn with_database(mut self, path: impl Into<PathBuf>) -> Self {
        self.database = path.into();
        self
    }

    /// Sets the transcript file.
    #[must_use]
    pub fn with_input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = path.into();
        self
    }

    /// Sets the author value identifying the customer.
    #[must_use]
    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = customer_id.into();
        self
    }
}
