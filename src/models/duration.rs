//! Estimated task durations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit of an estimated duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationUnit {
    /// Hours (the fallback for unrecognized units).
    #[default]
    Hours,
    /// Days.
    Days,
}

impl DurationUnit {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Hours => "hours",
            Self::Days => "days",
        }
    }

    /// Coerces a structured unit value.
    ///
    /// Only the exact words `hours` and `days` (any case) are recognized;
    /// everything else coerces to [`DurationUnit::Hours`].
    #[must_use]
    pub fn coerce(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "days" => Self::Days,
            _ => Self::Hours,
        }
    }

    /// Classifies a unit word matched in free text.
    ///
    /// Any spelling containing `hour` or `hr` is hours; every other matched
    /// spelling (`day`, `days`, `d`) is days.
    #[must_use]
    pub fn from_free_text(word: &str) -> Self {
        let lower = word.to_lowercase();
        if lower.contains("hour") || lower.contains("hr") {
            Self::Hours
        } else {
            Self::Days
        }
    }
}

impl fmt::Display for DurationUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An estimated duration: an optional quantity and a unit.
///
/// The unit is always one of the two enumerated values, so a present
/// quantity can never carry an unknown unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Duration {
    /// Number of units, absent when the source quantity was zero or unparseable.
    pub quantity: Option<f64>,
    /// Unit of the quantity.
    pub unit: DurationUnit,
}

impl Duration {
    /// Creates a duration with a known quantity.
    #[must_use]
    pub const fn new(quantity: f64, unit: DurationUnit) -> Self {
        Self {
            quantity: Some(quantity),
            unit,
        }
    }

    /// Shorthand for a duration in hours.
    #[must_use]
    pub const fn hours(quantity: f64) -> Self {
        Self::new(quantity, DurationUnit::Hours)
    }

    /// Shorthand for a duration in days.
    #[must_use]
    pub const fn days(quantity: f64) -> Self {
        Self::new(quantity, DurationUnit::Days)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.quantity {
            Some(q) => write!(f, "{q} {}", self.unit),
            None => write!(f, "? {}", self.unit),
        }
    }
}
