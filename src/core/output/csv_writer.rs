//! CSV chat report writer.

use std::fs::File;
use std::io::Write;

use crate::core::chat::Chat;
use crate::core::report::{REPORT_HEADER, ReportRow};
use crate::error::Result;

/// Writes the chat report to any writer.
///
/// # Format
/// - Delimiter: `,`
/// - Header: [`REPORT_HEADER`]
/// - One row per chat, in the given order
/// - Fields are never quoted
pub fn write_report<W: Write>(chats: &[Chat], writer: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b',')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    writer.write_record(REPORT_HEADER)?;

    for chat in chats {
        let row = ReportRow::from_chat(chat);
        writer.write_record(row.fields())?;
    }

    writer.flush()?;
    Ok(())
}

/// Writes the chat report to a file.
pub fn write_report_file(chats: &[Chat], output_path: &str) -> Result<()> {
    let file = File::create(output_path)?;
    write_report(chats, file)
}

/// Renders the chat report to a string.
pub fn to_report_csv(chats: &[Chat]) -> Result<String> {
    let mut buffer = Vec::new();
    write_report(chats, &mut buffer)?;
    let csv = String::from_utf8(buffer)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    Ok(csv)
}
