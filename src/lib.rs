//! # Intake
//!
//! Flexible-schema import and normalization engine.
//!
//! Intake ingests externally authored member and task records supplied as
//! JSON text, CSV text, or decoded spreadsheet rows, reconciles them against a
//! fixed internal schema, and hands back an [`io::ImportOutcome`] the caller
//! can commit into a live [`models::Collection`].
//!
//! ## Pipeline
//!
//! ```text
//! Sniff → Parse → MapAll → ValidateAll → Decide → Merge | Abort
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use intake::io::{ImportInput, ImportService, Confirmation};
//! use intake::io::kinds::MemberKind;
//! use intake::models::Collection;
//!
//! let service = ImportService::default();
//! let outcome = service.analyze::<MemberKind>(ImportInput::text(pasted))?;
//! let mut members = Collection::new();
//! service.commit(outcome, &mut members, Confirmation::Approved)?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

// Module declarations
pub mod config;
pub mod io;
pub mod models;
pub mod observability;

// Re-exports for convenience
pub use config::IntakeConfig;
pub use io::{
    Confirmation, Decision, ImportInput, ImportOptions, ImportOutcome, ImportService,
    ValidationError,
};
pub use models::{Collection, Duration, DurationUnit, Member, MemberProfile, Priority, Task};

/// Error type for intake operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When | Fatal |
/// |---------|-------------|-------|
/// | `UnsupportedFormat` | File extension is not json, csv, xlsx or xls | yes |
/// | `PayloadTooLarge` | Payload exceeds the configured byte limit | yes |
/// | `InvalidJson` | Text could not be coerced to a JSON value | yes |
/// | `EmptyInput` | No rows remain after parsing | yes |
/// | `NoValidRecords` | Every row failed validation | yes |
/// | `PartialImportDeclined` | Caller declined a partial import | no |
/// | `InvalidInput` | CLI arguments or collection files are malformed | yes |
/// | `OperationFailed` | I/O, spreadsheet decoding or configuration fails | yes |
#[derive(Debug, ThisError)]
pub enum Error {
    /// The file extension does not select a supported format.
    #[error("Invalid file format '.{extension}'. Supported formats: JSON, CSV, XLSX, XLS")]
    UnsupportedFormat {
        /// The rejected extension, lower-cased.
        extension: String,
    },

    /// The payload is larger than the import size cap.
    #[error("File size exceeds {} limit ({size} bytes). Please use a smaller file.", format_limit(*.limit))]
    PayloadTooLarge {
        /// Size of the rejected payload in bytes.
        size: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The text could not be parsed as JSON, even after extraction.
    #[error(
        "Invalid JSON format: {message}. Please ensure your JSON is valid and doesn't contain extra text or markdown code blocks."
    )]
    InvalidJson {
        /// Message reported by the JSON parser.
        message: String,
    },

    /// Parsing produced no rows.
    #[error("{0}")]
    EmptyInput(String),

    /// Every row failed validation, so nothing can be merged.
    #[error("{report}")]
    NoValidRecords {
        /// Failure report listing the first errors and the elided count.
        report: String,
    },

    /// The caller declined to merge a partially valid import.
    #[error("Import cancelled: {accepted} valid and {rejected} invalid row(s) were not merged")]
    PartialImportDeclined {
        /// Rows that would have been merged.
        accepted: usize,
        /// Rows that failed validation.
        rejected: usize,
    },

    /// Invalid input was provided outside the payload itself.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },
}

impl Error {
    /// Returns whether the caller has to re-supply input after this error.
    ///
    /// A declined partial import is the only non-fatal outcome: the caller
    /// chose not to merge and the target collection is untouched.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::PartialImportDeclined { .. })
    }
}

/// Renders a byte limit the way users read file sizes.
fn format_limit(limit: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if limit >= MIB && limit % MIB == 0 {
        format!("{}MB", limit / MIB)
    } else {
        format!("{limit} byte")
    }
}

/// Result type alias for intake operations.
pub type Result<T> = std::result::Result<T, Error>;
