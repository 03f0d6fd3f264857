//! Import orchestration.
//!
//! [`ImportService::analyze`] runs `Sniff → Parse → MapAll → ValidateAll` and
//! returns an [`ImportOutcome`]; [`ImportService::commit`] applies the
//! decision and, if allowed, merges the accepted records into a collection.
//! Nothing touches the collection until every row has been validated.

use crate::config::IntakeConfig;
use crate::io::fields::RawRow;
use crate::io::formats::spreadsheet::{CalamineDecoder, SheetDecoder};
use crate::io::formats::{self, DEFAULT_MAX_PAYLOAD_BYTES, Format, ImportInput};
use crate::io::kinds::{ImportKind, RecordKind};
use crate::io::validation::{ValidationError, format_error_list};
use crate::models::{Collection, RecordId};
use crate::{Error, Result};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Options for imports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportOptions {
    /// Payloads above this many bytes are rejected before parsing.
    pub max_payload_bytes: usize,
    /// Errors listed in a failure report.
    pub error_display_limit: usize,
    /// Errors listed in a confirmation prompt.
    pub confirm_preview_limit: usize,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            max_payload_bytes: DEFAULT_MAX_PAYLOAD_BYTES,
            error_display_limit: 10,
            confirm_preview_limit: 5,
        }
    }
}

impl ImportOptions {
    /// Sets the payload cap.
    #[must_use]
    pub const fn with_max_payload_bytes(mut self, bytes: usize) -> Self {
        self.max_payload_bytes = bytes;
        self
    }

    /// Sets how many errors a failure report lists.
    #[must_use]
    pub const fn with_error_display_limit(mut self, limit: usize) -> Self {
        self.error_display_limit = limit;
        self
    }

    /// Sets how many errors a confirmation prompt lists.
    #[must_use]
    pub const fn with_confirm_preview_limit(mut self, limit: usize) -> Self {
        self.confirm_preview_limit = limit;
        self
    }
}

impl From<&IntakeConfig> for ImportOptions {
    fn from(config: &IntakeConfig) -> Self {
        Self {
            max_payload_bytes: config.max_payload_bytes,
            error_display_limit: config.error_display_limit,
            confirm_preview_limit: config.confirm_preview_limit,
        }
    }
}

/// What the caller has to do with an [`ImportOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Every row is valid; merge without asking.
    Ready,
    /// Some rows are valid and some are not; ask before merging.
    NeedsConfirmation {
        /// Rows that would be merged.
        accepted: usize,
        /// Rows that failed validation.
        rejected: usize,
    },
    /// No row is valid; nothing can be merged.
    Rejected,
}

/// The caller's answer to a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    /// Merge the valid rows.
    Approved,
    /// Leave the collection untouched.
    Declined,
}

impl From<bool> for Confirmation {
    fn from(approved: bool) -> Self {
        if approved {
            Self::Approved
        } else {
            Self::Declined
        }
    }
}

/// Result of analyzing one payload.
///
/// Created fresh per call and read-only afterwards; it holds records the
/// caller may merge and the errors of every row that was excluded. The only
/// way to take the records out is [`ImportService::commit`].
#[derive(Debug, Clone)]
pub struct ImportOutcome<T> {
    kind: ImportKind,
    format: Format,
    accepted: Vec<T>,
    errors: Vec<ValidationError>,
    total_rows: usize,
    rejected_rows: usize,
    noun: &'static str,
}

impl<T> ImportOutcome<T> {
    /// Kind of record analyzed.
    #[must_use]
    pub const fn kind(&self) -> ImportKind {
        self.kind
    }

    /// Format the payload was parsed as.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Records with no validation errors, in input order.
    #[must_use]
    pub fn accepted(&self) -> &[T] {
        &self.accepted
    }

    /// Errors of the excluded rows, in input order.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Rows produced by parsing.
    #[must_use]
    pub const fn total_rows(&self) -> usize {
        self.total_rows
    }

    /// Returns the number of rows that failed validation.
    #[must_use]
    pub const fn rejected_rows(&self) -> usize {
        self.rejected_rows
    }

    /// Returns what the caller has to do next.
    #[must_use]
    pub fn decision(&self) -> Decision {
        match (self.accepted.is_empty(), self.errors.is_empty()) {
            (true, _) => Decision::Rejected,
            (false, true) => Decision::Ready,
            (false, false) => Decision::NeedsConfirmation {
                accepted: self.accepted.len(),
                rejected: self.rejected_rows(),
            },
        }
    }

    /// Text of the confirmation step for a partially valid import.
    #[must_use]
    pub fn confirmation_prompt(&self, preview_limit: usize) -> String {
        let preview: Vec<String> = self
            .errors
            .iter()
            .take(preview_limit)
            .map(ToString::to_string)
            .collect();
        format!(
            "{} validation error(s) found. {} valid {}(s) will be imported.\n\nFirst few errors:\n{}\n\nContinue with import?",
            self.errors.len(),
            self.accepted.len(),
            self.noun,
            preview.join("\n")
        )
    }

    /// Report shown when the import fails because no row is valid.
    #[must_use]
    pub fn failure_report(&self, display_limit: usize) -> String {
        format!(
            "Validation failed:\n{}",
            format_error_list(&self.errors, display_limit)
        )
    }

    /// Summary shown after a merge.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "Successfully imported {} {}(s).",
            self.accepted.len(),
            self.noun
        );
        if !self.errors.is_empty() {
            summary.push_str(&format!(" ({} error(s) were skipped)", self.errors.len()));
        }
        summary
    }
}

impl<T> fmt::Display for ImportOutcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} row(s): {} valid, {} invalid",
            self.total_rows,
            self.kind,
            self.accepted.len(),
            self.rejected_rows()
        )
    }
}

/// Service running the import pipeline.
pub struct ImportService {
    options: ImportOptions,
    decoder: Arc<dyn SheetDecoder>,
}

impl Default for ImportService {
    fn default() -> Self {
        Self::new(ImportOptions::default())
    }
}

impl ImportService {
    /// Creates a service that decodes spreadsheets with `calamine`.
    #[must_use]
    pub fn new(options: ImportOptions) -> Self {
        Self {
            options,
            decoder: Arc::new(CalamineDecoder),
        }
    }

    /// Replaces the spreadsheet decoder.
    #[must_use]
    pub fn with_decoder(mut self, decoder: Arc<dyn SheetDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Returns the options in effect.
    #[must_use]
    pub const fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Parses, maps and validates a payload.
    ///
    /// Every row is mapped and validated; a bad row never stops the rows
    /// after it. Row numbers in the returned errors are 1-indexed.
    ///
    /// # Errors
    ///
    /// Fails without producing an outcome if the payload has an unsupported
    /// extension, is too large, is not valid JSON, or yields no rows.
    #[instrument(skip(self, input), fields(kind = %K::KIND, bytes = input.byte_len()))]
    pub fn analyze<K: RecordKind>(&self, input: ImportInput) -> Result<ImportOutcome<K::Record>> {
        let format = formats::sniff(&input, self.options.max_payload_bytes)?;
        debug!(%format, "sniffed payload");

        let empty_message = match (&input, format) {
            (_, Format::Spreadsheet) => "Spreadsheet is empty or has no data",
            (ImportInput::Text(_), _) => "No data found in the pasted content.",
            _ => "No data found in the file.",
        };
        let rows = self.parse::<K>(input, format)?;
        if rows.is_empty() {
            return Err(Error::EmptyInput(empty_message.to_string()));
        }
        debug!(rows = rows.len(), "parsed rows");

        let total_rows = rows.len();
        let mut accepted = Vec::with_capacity(total_rows);
        let mut errors = Vec::new();

        for (index, row) in rows.iter().enumerate() {
            let record = K::map(row);
            let messages = K::validate(row, &record);
            if messages.is_empty() {
                accepted.push(record);
            } else {
                errors.extend(
                    messages
                        .into_iter()
                        .map(|message| ValidationError::new(index + 1, message)),
                );
            }
        }

        let outcome = ImportOutcome {
            kind: K::KIND,
            format,
            rejected_rows: total_rows - accepted.len(),
            accepted,
            errors,
            total_rows,
            noun: K::NOUN,
        };

        if outcome.errors.is_empty() {
            debug!(accepted = outcome.accepted.len(), "all rows valid");
        } else {
            warn!(
                accepted = outcome.accepted.len(),
                rejected = outcome.rejected_rows(),
                errors = outcome.errors.len(),
                "rows rejected during validation"
            );
        }

        Ok(outcome)
    }

    fn parse<K: RecordKind>(&self, input: ImportInput, format: Format) -> Result<Vec<RawRow>> {
        match input {
            ImportInput::Rows(rows) => Ok(rows),
            ImportInput::File { bytes, .. } if format == Format::Spreadsheet => {
                self.decoder.decode_first_sheet(&bytes)
            },
            ImportInput::File { bytes, .. } => parse_text::<K>(&formats::decode_text(&bytes), format),
            ImportInput::Text(text) => parse_text::<K>(&text, format),
        }
    }

    /// Applies the outcome's decision and merges the accepted records.
    ///
    /// Returns the ids assigned to the merged records. Records are appended
    /// after the existing entries; existing entries are never replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoValidRecords`] if no row was valid, and
    /// [`Error::PartialImportDeclined`] if confirmation was needed and
    /// declined. In both cases `target` is unchanged.
    pub fn commit<T>(
        &self,
        outcome: ImportOutcome<T>,
        target: &mut Collection<T>,
        confirmation: Confirmation,
    ) -> Result<Vec<RecordId>> {
        match (outcome.decision(), confirmation) {
            (Decision::Rejected, _) => Err(Error::NoValidRecords {
                report: outcome.failure_report(self.options.error_display_limit),
            }),
            (Decision::NeedsConfirmation { accepted, rejected }, Confirmation::Declined) => {
                info!(accepted, rejected, "partial import declined");
                Err(Error::PartialImportDeclined { accepted, rejected })
            },
            _ => {
                let ids = target.append(outcome.accepted);
                info!(
                    kind = %outcome.kind,
                    merged = ids.len(),
                    skipped = outcome.errors.len(),
                    total = target.len(),
                    "merged import"
                );
                Ok(ids)
            },
        }
    }
}

fn parse_text<K: RecordKind>(text: &str, format: Format) -> Result<Vec<RawRow>> {
    match format {
        Format::Json => {
            let value = formats::json::extract_json(text)?;
            Ok(formats::json::rows_from_value(value, K::COLLECTION_KEY))
        },
        Format::Csv => formats::csv::parse_rows(text),
        // Spreadsheet payloads never arrive as text.
        Format::Spreadsheet => Err(Error::InvalidInput(
            "spreadsheet data cannot be parsed from text".to_string(),
        )),
    }
}
