//! JSON format adapter for import/export.
//!
//! Pasted JSON often arrives wrapped in a fenced code block or surrounded by
//! prose. [`extract_json`] strips one leading and one trailing fence, then
//! keeps the span from the first `{` or `[` (whichever comes first) to the
//! last matching closer before handing it to `serde_json`.
//!
//! The closer is the *last* occurrence of `}` or `]`, not a balanced scan, so
//! trailing prose containing a stray closer of the same kind is swallowed into
//! the candidate and makes parsing fail.

use crate::io::fields::RawRow;
use crate::io::traits::{ExportRecord, ExportSink};
use crate::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::io::Write;
use std::sync::LazyLock;

/// Opening code fence, optionally tagged `json`.
static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^```(?:json)?\s*\n?").unwrap_or_else(|_| unreachable!()));

/// Closing code fence at the end of the text.
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n?```\s*$").unwrap_or_else(|_| unreachable!()));

/// Returns the candidate JSON document inside `text`.
///
/// If no opener/closer pair is found the fence-stripped text is returned as
/// is, so the parser reports what is wrong with it.
#[must_use]
pub fn isolate_json(text: &str) -> String {
    let trimmed = text.trim();
    let unfenced = LEADING_FENCE.replace(trimmed, "");
    let cleaned = TRAILING_FENCE.replace(&unfenced, "");

    let first_brace = cleaned.find('{');
    let first_bracket = cleaned.find('[');

    let span = match (first_bracket, first_brace) {
        (Some(bracket), brace) if brace.is_none_or(|b| bracket < b) => {
            cleaned.rfind(']').map(|end| (bracket, end))
        },
        (_, Some(brace)) => cleaned.rfind('}').map(|end| (brace, end)),
        _ => None,
    };

    match span {
        Some((start, end)) if end > start => cleaned[start..=end].to_string(),
        _ => cleaned.into_owned(),
    }
}

/// Recovers a JSON value from text that may carry fences or prose.
///
/// # Errors
///
/// Returns [`Error::InvalidJson`] with the parser's message if the isolated
/// candidate is not valid JSON.
pub fn extract_json(text: &str) -> Result<Value> {
    let candidate = isolate_json(text);
    serde_json::from_str(&candidate).map_err(|e| Error::InvalidJson {
        message: e.to_string(),
    })
}

/// Turns a parsed document into raw rows.
///
/// Accepts a top-level array, or an object carrying the rows under
/// `collection_key` (e.g. `members`, `tasks`) or `data`. Array elements that
/// are not objects become empty rows so they still fail validation with a row
/// number. Any other shape yields no rows.
#[must_use]
pub fn rows_from_value(value: Value, collection_key: &str) -> Vec<RawRow> {
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut object) => {
            let rows = object
                .remove(collection_key)
                .filter(|v| !v.is_null())
                .or_else(|| object.remove("data"));
            match rows {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        },
        _ => Vec::new(),
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(row) => row,
            _ => RawRow::new(),
        })
        .collect()
}

/// JSON export sink.
///
/// Writes records as one pretty-printed JSON array, the shape the importer
/// reads back.
pub struct JsonExportSink<W: Write> {
    writer: W,
    records: Vec<Value>,
}

impl<W: Write> JsonExportSink<W> {
    /// Creates a new JSON export sink.
    #[must_use]
    pub const fn new(writer: W) -> Self {
        Self {
            writer,
            records: Vec::new(),
        }
    }
}

impl<T: ExportRecord, W: Write> ExportSink<T> for JsonExportSink<W> {
    fn write(&mut self, record: &T) -> Result<()> {
        let value = serde_json::to_value(record).map_err(|e| Error::OperationFailed {
            operation: "serialize_json".to_string(),
            cause: e.to_string(),
        })?;
        self.records.push(value);
        Ok(())
    }

    fn finalize(mut self: Box<Self>) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.records).map_err(|e| {
            Error::OperationFailed {
                operation: "write_json".to_string(),
                cause: e.to_string(),
            }
        })?;
        writeln!(self.writer).map_err(|e| Error::OperationFailed {
            operation: "write_json".to_string(),
            cause: e.to_string(),
        })?;
        self.writer.flush().map_err(|e| Error::OperationFailed {
            operation: "flush_json".to_string(),
            cause: e.to_string(),
        })
    }
}
