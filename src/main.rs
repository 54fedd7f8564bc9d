//! # supportpack CLI
//!
//! Command-line interface for the supportpack library.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::process;

use clap::Parser as ClapParser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use supportpack::cli::{Args, Command};
use supportpack::config::SupportConfig;
use supportpack::core::output::write_report;
use supportpack::parser::TextEntryParser;
use supportpack::pipeline::{IngestionPipeline, require_chat};
use supportpack::store::{SqliteStore, Store};
use supportpack::SupportError;

fn main() {
    let args = <Args as ClapParser>::parse();
    init_logging(args.log_level());

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Logs go to stderr so the report on stdout stays clean. `RUST_LOG` wins
/// over `-v` when set.
fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("supportpack={}", default_level)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(args: &Args) -> Result<(), SupportError> {
    let config = args.config();
    let store = SqliteStore::open(&config.database)?;

    match &args.command {
        Command::Import => import(&store, &config),
        Command::Count => count(&store),
        Command::Print { chat_id } => print_chat(&store, chat_id),
        Command::Chatreport => chat_report(&store),
    }
}

fn import(store: &SqliteStore, config: &SupportConfig) -> Result<(), SupportError> {
    let file = File::open(&config.input)?;
    info!(input = %config.input.display(), "Importing transcript");

    let parser = TextEntryParser::with_customer_id(config.customer_id.as_str());
    let summary = IngestionPipeline::with_parser(store, parser).run(BufReader::new(file))?;

    info!(
        imported = summary.imported,
        skipped = summary.skipped(),
        "Imported {} of {} lines",
        summary.imported,
        summary.lines
    );
    Ok(())
}

fn count(store: &SqliteStore) -> Result<(), SupportError> {
    let mut out = io::stdout().lock();
    writeln!(out, "chats:  {}", store.count_chats()?)?;
    writeln!(out, "entries:  {}", store.count_entries()?)?;
    Ok(())
}

fn print_chat(store: &SqliteStore, chat_id: &str) -> Result<(), SupportError> {
    let chat = require_chat(store, chat_id)?;
    writeln!(io::stdout().lock(), "{:#?}", chat)?;
    Ok(())
}

fn chat_report(store: &SqliteStore) -> Result<(), SupportError> {
    let chats = store.all_chats()?;
    write_report(&chats, io::stdout().lock())
}
