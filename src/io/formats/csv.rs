//! CSV format adapter for import/export.
//!
//! Import uses a line-oriented tokenizer: each non-blank line is one record,
//! fields are comma-separated, double quotes group text containing commas and
//! `""` inside a quoted run is a literal quote. Export goes through the `csv`
//! crate, whose quoting the tokenizer reads back.

use crate::io::fields::RawRow;
use crate::io::traits::{ExportRecord, ExportSink};
use crate::{Error, Result};
use serde_json::Value;
use std::io::Write;

/// Splits one line of delimited text into trimmed field values.
///
/// A `"` toggles quoting unless it is inside a quoted run and immediately
/// followed by another `"`, in which case a literal `"` is kept. A `,` outside
/// quotes ends the current field. Each field is trimmed and then stripped of
/// one enclosing pair of quotes if any survived.
#[must_use]
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            },
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(finish_field(&mut current)),
            _ => current.push(c),
        }
    }
    fields.push(finish_field(&mut current));

    fields
}

fn finish_field(current: &mut String) -> String {
    let field = std::mem::take(current);
    strip_enclosing_quotes(field.trim()).to_string()
}

fn strip_enclosing_quotes(field: &str) -> &str {
    field
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(field)
}

/// Parses CSV text into raw rows keyed by the header line.
///
/// Blank lines are skipped. Tokens are zipped positionally against the
/// header; missing trailing cells become empty strings and extra cells are
/// ignored. Rows whose fields are all empty are dropped.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] if the text has no non-blank line.
pub fn parse_rows(text: &str) -> Result<Vec<RawRow>> {
    let mut lines = text.split('\n').filter(|line| !line.trim().is_empty());

    let Some(header_line) = lines.next() else {
        return Err(Error::EmptyInput("CSV file is empty".to_string()));
    };
    let headers = tokenize_line(header_line);

    let rows = lines
        .map(tokenize_line)
        .filter(|values| values.iter().any(|v| !v.is_empty()))
        .map(|values| {
            headers
                .iter()
                .enumerate()
                .map(|(i, header)| {
                    let cell = values.get(i).cloned().unwrap_or_default();
                    (header.clone(), Value::String(cell))
                })
                .collect::<RawRow>()
        })
        .collect();

    Ok(rows)
}

/// CSV export sink.
///
/// Writes records as CSV with a header row.
pub struct CsvExportSink<W: Write> {
    writer: csv::Writer<W>,
    /// Whether headers have been written.
    headers_written: bool,
}

impl<W: Write> CsvExportSink<W> {
    /// Creates a new CSV export sink.
    #[must_use]
    pub fn new(writer: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);

        Self {
            writer,
            headers_written: false,
        }
    }

    fn write_headers(&mut self, headers: &[&str]) -> Result<()> {
        if !self.headers_written {
            self.writer
                .write_record(headers)
                .map_err(|e| Error::OperationFailed {
                    operation: "write_csv_headers".to_string(),
                    cause: e.to_string(),
                })?;
            self.headers_written = true;
        }
        Ok(())
    }
}

impl<T: ExportRecord, W: Write> ExportSink<T> for CsvExportSink<W> {
    fn write(&mut self, record: &T) -> Result<()> {
        self.write_headers(T::headers())?;
        self.writer
            .write_record(record.cells())
            .map_err(|e| Error::OperationFailed {
                operation: "write_csv".to_string(),
                cause: e.to_string(),
            })
    }

    fn finalize(mut self: Box<Self>) -> Result<()> {
        // An empty export still gets a header row so it re-imports cleanly.
        self.write_headers(T::headers())?;
        self.writer.flush().map_err(|e| Error::OperationFailed {
            operation: "flush_csv".to_string(),
            cause: e.to_string(),
        })
    }
}
