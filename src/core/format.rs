// AgentView - core/format.rs
//
// Display formatting for log collections. Shared by the GUI panels and the
// headless CLI so both render records identically.

use crate::core::model::{LogCollection, LogRecord};

/// Pretty-print a collection as JSON with two-space indentation.
///
/// An empty collection renders as `[]`.
pub fn collection_json(records: &LogCollection) -> String {
    // Serialising plain strings and vectors cannot fail.
    serde_json::to_string_pretty(records).unwrap_or_else(|_| "[]".to_string())
}

/// Concatenate a record's lines without separators.
///
/// Backend lines keep their own trailing newlines, so joining with nothing
/// reproduces the original file text.
pub fn joined_lines(record: &LogRecord) -> String {
    record.lines.concat()
}

/// Heading shown above a record's lines.
pub fn record_heading(record: &LogRecord) -> String {
    format!("File: {}", record.file)
}
