//! Format adapters and format sniffing.
//!
//! [`sniff`] classifies an [`ImportInput`] without parsing it: uploaded files
//! by extension, pasted text by how it starts, and
//! already-decoded rows as spreadsheet data. Oversized payloads are rejected
//! here, before any tokenizing or parsing starts.

pub mod csv;
pub mod json;
pub mod spreadsheet;

use crate::io::fields::RawRow;
use crate::{Error, Result};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Default payload cap: 10 MiB.
pub const DEFAULT_MAX_PAYLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Import payload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// JSON text, possibly wrapped in prose or code fences.
    Json,
    /// Comma-separated text with a header line.
    Csv,
    /// Spreadsheet rows, decoded from a workbook or supplied pre-decoded.
    Spreadsheet,
}

impl Format {
    /// Selects a format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for anything other than `json`,
    /// `csv`, `xlsx` or `xls` (case-insensitive).
    pub fn from_extension(extension: &str) -> Result<Self> {
        let ext = extension.trim_start_matches('.').to_lowercase();
        match ext.as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "xlsx" | "xls" => Ok(Self::Spreadsheet),
            _ => Err(Error::UnsupportedFormat { extension: ext }),
        }
    }

    /// Selects a format from a file name or path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if the extension is missing or not
    /// supported.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        Self::from_extension(ext)
    }

    /// Classifies pasted text: JSON if it starts with `{`, `[` or a code
    /// fence, else CSV.
    #[must_use]
    pub fn sniff_text(text: &str) -> Self {
        let text = strip_bom(text).trim_start();
        if text.starts_with(['{', '[']) || text.starts_with("```") {
            Self::Json
        } else {
            Self::Csv
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Spreadsheet => "spreadsheet",
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "spreadsheet" => Ok(Self::Spreadsheet),
            other => Self::from_extension(other),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw payload handed to the import pipeline.
#[derive(Debug, Clone)]
pub enum ImportInput {
    /// Pasted text with no file name.
    Text(String),
    /// An uploaded file.
    File {
        /// File name, used for its extension.
        name: String,
        /// File contents.
        bytes: Vec<u8>,
    },
    /// Rows already decoded from a spreadsheet by the caller.
    Rows(Vec<RawRow>),
}

impl ImportInput {
    /// Wraps pasted text.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Wraps an uploaded file.
    #[must_use]
    pub fn file(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self::File {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    /// Wraps pre-decoded spreadsheet rows.
    #[must_use]
    pub const fn rows(rows: Vec<RawRow>) -> Self {
        Self::Rows(rows)
    }

    /// Returns the payload size in bytes (zero for pre-decoded rows).
    #[must_use]
    pub fn byte_len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::File { bytes, .. } => bytes.len(),
            Self::Rows(_) => 0,
        }
    }
}

/// Classifies an input, enforcing the payload cap.
///
/// For files the extension is checked before the size, so an unsupported
/// file is reported as such regardless of size.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] for unknown file extensions and
/// [`Error::PayloadTooLarge`] for payloads above `max_bytes`.
pub fn sniff(input: &ImportInput, max_bytes: usize) -> Result<Format> {
    match input {
        ImportInput::Rows(_) => Ok(Format::Spreadsheet),
        ImportInput::File { name, bytes } => {
            let format = Format::from_path(Path::new(name))?;
            check_size(bytes.len(), max_bytes)?;
            Ok(format)
        },
        ImportInput::Text(text) => {
            check_size(text.len(), max_bytes)?;
            Ok(Format::sniff_text(text))
        },
    }
}

fn check_size(size: usize, limit: usize) -> Result<()> {
    if size > limit {
        return Err(Error::PayloadTooLarge { size, limit });
    }
    Ok(())
}

/// Decodes file bytes as UTF-8 text, replacing invalid sequences and
/// dropping a leading byte-order mark.
#[must_use]
pub fn decode_text(bytes: &[u8]) -> String {
    strip_bom(&String::from_utf8_lossy(bytes)).to_string()
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("members.json", Format::Json)]
    #[test_case("members.CSV", Format::Csv)]
    #[test_case("Roster.xlsx", Format::Spreadsheet)]
    #[test_case("legacy.xls", Format::Spreadsheet)]
    fn test_format_from_path(name: &str, expected: Format) {
        assert_eq!(Format::from_path(Path::new(name)).unwrap(), expected);
    }

    #[test_case("notes.txt" ; "text file")]
    #[test_case("members" ; "no extension")]
    #[test_case("members.json.bak" ; "backup suffix")]
    fn test_format_from_path_unsupported(name: &str) {
        assert!(matches!(
            Format::from_path(Path::new(name)),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test_case("[{\"a\":1}]", Format::Json ; "array")]
    #[test_case("  \n {\"tasks\": []}", Format::Json ; "padded object")]
    #[test_case("\u{feff}[1]", Format::Json ; "bom")]
    #[test_case("Task,Description\nA,B", Format::Csv ; "csv")]
    #[test_case("```json\n[]\n```", Format::Json ; "fenced block")]
    #[test_case("`a`,b\n1,2", Format::Csv ; "single backtick")]
    #[test_case("", Format::Csv ; "empty")]
    fn test_sniff_text(text: &str, expected: Format) {
        assert_eq!(Format::sniff_text(text), expected);
    }

    #[test]
    fn test_sniff_rejects_oversized_payload() {
        let input = ImportInput::file("big.csv", vec![b'a'; 11]);
        assert!(matches!(
            sniff(&input, 10),
            Err(Error::PayloadTooLarge { size: 11, limit: 10 })
        ));

        let input = ImportInput::text("x".repeat(11));
        assert!(matches!(
            sniff(&input, 10),
            Err(Error::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_sniff_checks_extension_before_size() {
        let input = ImportInput::file("big.pdf", vec![0; 11]);
        assert!(matches!(
            sniff(&input, 10),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_sniff_rows_and_limit_boundary() {
        assert_eq!(
            sniff(&ImportInput::rows(Vec::new()), 0).unwrap(),
            Format::Spreadsheet
        );
        let input = ImportInput::file("exact.json", vec![b' '; 10]);
        assert_eq!(sniff(&input, 10).unwrap(), Format::Json);
    }

    #[test]
    fn test_decode_text_strips_bom() {
        assert_eq!(decode_text(b"\xef\xbb\xbfTask\n"), "Task\n");
        assert_eq!(decode_text(b"ok"), "ok");
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<Format>().unwrap(), Format::Json);
        assert_eq!("xls".parse::<Format>().unwrap(), Format::Spreadsheet);
        assert_eq!("spreadsheet".parse::<Format>().unwrap(), Format::Spreadsheet);
        assert!("yaml".parse::<Format>().is_err());
    }
}
