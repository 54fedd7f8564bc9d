//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - global flags and the chosen [`Command`]
//! - [`Command`] - `import`, `count`, `print`, `chatreport`
//!
//! ```rust
//! use clap::Parser;
//! use supportpack::cli::{Args, Command};
//!
//! let args = Args::parse_from(["supportpack", "--db", "x.db", "print", "C100"]);
//! assert!(matches!(args.command, Command::Print { ref chat_id } if chat_id == "C100"));
//! assert_eq!(args.config().database.to_str(), Some("x.db"));
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_DATABASE, DEFAULT_INPUT, SupportConfig};
use crate::entry::CUSTOMER_ID;

/// Import support-chat transcripts and analyse support response.
#[derive(Parser, Debug, Clone)]
#[command(name = "supportpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    supportpack import
    supportpack --input march.tsv import
    supportpack count
    supportpack print C100
    supportpack chatreport > report.csv")]
pub struct Args {
    /// SQLite database file
    #[arg(long, global = true, env = "SUPPORT_DB", default_value = DEFAULT_DATABASE)]
    pub db: PathBuf,

    /// Transcript file read by `import`
    #[arg(long, global = true, env = "SUPPORT_INPUT", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Author value identifying the customer
    #[arg(long, global = true, default_value = CUSTOMER_ID)]
    pub customer: String,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Builds the run configuration from the parsed flags.
    pub fn config(&self) -> SupportConfig {
        SupportConfig::new()
            .with_database(self.db.clone())
            .with_input(self.input.clone())
            .with_customer_id(self.customer.clone())
    }

    /// Log filter directive implied by `-v` flags.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Imports transcript lines from the input file
    Import,

    /// Prints the number of stored chats and entries
    Count,

    /// Prints the chat with the given id
    Print {
        /// Chat id, as found between brackets in the title
        chat_id: String,
    },

    /// Prints a CSV report with one row per chat
    Chatreport,
}
