//! Row-scoped validation errors and shared format checks.
//!
//! Validators never fail: each rule that does not hold contributes one
//! message, and every message for a row is collected before the next row is
//! looked at.

use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Conventional `local@domain.tld` shape.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap_or_else(|_| unreachable!()));

/// Digits, whitespace and `+()-`.
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\d\s\-+()]+$").unwrap_or_else(|_| unreachable!()));

/// A validation failure attributable to exactly one input row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// 1-indexed position of the row, as users count rows.
    pub row_index: usize,
    /// Human-readable reason.
    pub message: String,
}

impl ValidationError {
    /// Creates an error for the given 1-indexed row.
    #[must_use]
    pub fn new(row_index: usize, message: impl Into<String>) -> Self {
        Self {
            row_index,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Row {}: {}", self.row_index, self.message)
    }
}

/// Returns whether `email` has a conventional address shape.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Returns whether `phone` contains only digits, spaces and `+()-`.
#[must_use]
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_PATTERN.is_match(phone)
}

/// Returns whether a text field is blank after trimming.
#[must_use]
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Renders errors as a bounded list.
///
/// At most `limit` errors are listed, one per line; if more exist a final
/// `... and N more errors` line is appended.
#[must_use]
pub fn format_error_list(errors: &[ValidationError], limit: usize) -> String {
    let mut lines: Vec<String> = errors.iter().take(limit).map(ToString::to_string).collect();
    if errors.len() > limit {
        lines.push(format!("... and {} more errors", errors.len() - limit));
    }
    lines.join("\n")
}
