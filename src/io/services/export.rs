//! Record export.
//!
//! Writes normalized records as a JSON array or as CSV, both shapes the
//! importer reads back.

use crate::io::formats::Format;
use crate::io::formats::csv::CsvExportSink;
use crate::io::formats::json::JsonExportSink;
use crate::io::traits::{ExportRecord, ExportSink};
use crate::{Error, Result};
use std::io::Write;
use std::path::Path;

/// Selects the export format from an output path.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for anything but `.json` or `.csv`.
pub fn export_format(path: &Path) -> Result<Format> {
    match Format::from_path(path)? {
        Format::Spreadsheet => Err(Error::UnsupportedFormat {
            extension: path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_lowercase(),
        }),
        format => Ok(format),
    }
}

/// Creates an export sink for the given format.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] for spreadsheet output, which is not
/// supported.
pub fn create_export_sink<'w, T: ExportRecord + 'w, W: Write + 'w>(
    writer: W,
    format: Format,
) -> Result<Box<dyn ExportSink<T> + 'w>> {
    match format {
        Format::Json => Ok(Box::new(JsonExportSink::new(writer))),
        Format::Csv => Ok(Box::new(CsvExportSink::new(writer))),
        Format::Spreadsheet => Err(Error::InvalidInput(
            "spreadsheet export is not supported; use .json or .csv".to_string(),
        )),
    }
}

/// Writes every record to `writer` in `format`, returning how many were
/// written.
///
/// # Errors
///
/// Returns an error if the format cannot be exported or writing fails.
pub fn export_records<'a, T, W>(
    records: impl IntoIterator<Item = &'a T>,
    format: Format,
    writer: W,
) -> Result<usize>
where
    T: ExportRecord + 'a,
    W: Write,
{
    let mut sink = create_export_sink::<T, W>(writer, format)?;
    let mut written = 0;
    for record in records {
        sink.write(record)?;
        written += 1;
    }
    sink.finalize()?;
    tracing::debug!(%format, written, "exported records");
    Ok(written)
}
