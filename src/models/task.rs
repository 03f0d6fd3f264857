//! Task records.

use super::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// High priority.
    High,
    /// Medium priority (the default).
    #[default]
    Medium,
    /// Low priority.
    Low,
}

impl Priority {
    /// Returns all priorities, highest first.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::High, Self::Medium, Self::Low]
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parses a priority string, case-insensitively.
    ///
    /// Returns `None` for anything other than `high`, `medium` or `low`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Parses a priority, falling back to [`Priority::Medium`].
    #[must_use]
    pub fn normalize(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work in an event plan.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Task {
    /// Task title.
    pub task: String,
    /// What the task involves.
    #[serde(default)]
    pub description: String,
    /// Priority, never blank.
    #[serde(default)]
    pub priority: Priority,
    /// Estimated effort, if one could be recovered.
    #[serde(default)]
    pub estimated_duration: Option<Duration>,
}

impl Task {
    /// Creates a task with medium priority and no estimate.
    #[must_use]
    pub fn new(task: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            description: description.into(),
            priority: Priority::Medium,
            estimated_duration: None,
        }
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the estimated duration.
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.estimated_duration = Some(duration);
        self
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.priority, self.task)?;
        if let Some(duration) = &self.estimated_duration {
            write!(f, " ({duration})")?;
        }
        Ok(())
    }
}
