//! Record kinds.
//!
//! A [`RecordKind`] bundles everything the import pipeline needs to know
//! about one target record type: its alias tables, how a [`RawRow`] is mapped
//! into a record, and which rules a mapped row has to satisfy. The pipeline
//! itself is generic over the kind.

mod member;
mod task;

pub use member::MemberKind;
pub use task::TaskKind;

use crate::io::fields::RawRow;
use crate::io::traits::ExportRecord;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::str::FromStr;

/// The record kinds the engine can import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportKind {
    /// People and organizations.
    Members,
    /// Event tasks.
    Tasks,
}

impl ImportKind {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Members => "members",
            Self::Tasks => "tasks",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "members" | "member" => Ok(Self::Members),
            "tasks" | "task" => Ok(Self::Tasks),
            other => Err(crate::Error::InvalidInput(format!(
                "unknown record kind '{other}', expected members or tasks"
            ))),
        }
    }
}

/// Descriptor for one importable record type.
pub trait RecordKind {
    /// The normalized record produced by [`RecordKind::map`].
    type Record: ExportRecord + DeserializeOwned + Serialize + Clone + Send;

    /// Which kind this is.
    const KIND: ImportKind;

    /// Singular noun used in user-facing counts, e.g. `member`.
    const NOUN: &'static str;

    /// JSON property that may wrap the rows of this kind, e.g. `members`.
    const COLLECTION_KEY: &'static str;

    /// Builds a record from one raw row.
    ///
    /// Mapping never fails: missing fields take their defaults and
    /// coercions fall back to their documented values.
    fn map(row: &RawRow) -> Self::Record;

    /// Checks a mapped row, returning one message per broken rule.
    ///
    /// Both the raw row and its mapped record are available so rules can
    /// inspect values the mapper would otherwise silently coerce.
    fn validate(row: &RawRow, record: &Self::Record) -> Vec<String>;
}
