//! Core traits for exporting normalized records.
//!
//! Defines [`ExportRecord`], implemented by every record kind, and
//! [`ExportSink`], implemented by format adapters.

use crate::Result;
use crate::models::{Member, MemberProfile, Task};
use serde::Serialize;

/// A record that can be written by an [`ExportSink`].
///
/// Column names are chosen so that an exported CSV re-imports through the
/// alias tables unchanged.
pub trait ExportRecord: Serialize {
    /// Column headers, in output order.
    fn headers() -> &'static [&'static str];

    /// Cell values, aligned with [`ExportRecord::headers`].
    fn cells(&self) -> Vec<String>;
}

impl ExportRecord for Member {
    fn headers() -> &'static [&'static str] {
        &[
            "type",
            "firstName",
            "lastName",
            "name",
            "offline",
            "specializedIn",
            "experience",
            "address",
            "phone",
            "whatsapp",
            "email",
        ]
    }

    fn cells(&self) -> Vec<String> {
        let (first_name, last_name, name, offline) = match &self.profile {
            MemberProfile::Person {
                first_name,
                last_name,
            } => (first_name.as_str(), last_name.as_str(), "", String::new()),
            MemberProfile::Entity { name, offline } => ("", "", name.as_str(), offline.to_string()),
        };
        vec![
            self.profile.type_name().to_string(),
            first_name.to_string(),
            last_name.to_string(),
            name.to_string(),
            offline,
            self.specialized_in.clone(),
            self.experience.clone(),
            self.address.clone(),
            self.phone.clone(),
            self.whatsapp.clone(),
            self.email.clone(),
        ]
    }
}

impl ExportRecord for Task {
    fn headers() -> &'static [&'static str] {
        &["task", "description", "priority", "quantity", "unit"]
    }

    fn cells(&self) -> Vec<String> {
        let (quantity, unit) = self.estimated_duration.map_or_else(
            || (String::new(), String::new()),
            |d| {
                (
                    d.quantity.map(|q| q.to_string()).unwrap_or_default(),
                    d.unit.to_string(),
                )
            },
        );
        vec![
            self.task.clone(),
            self.description.clone(),
            self.priority.to_string(),
            quantity,
            unit,
        ]
    }
}

/// Sink for exported records.
///
/// # Lifecycle
///
/// 1. Create sink with output destination
/// 2. Call `write()` for each record
/// 3. Call `finalize()` to complete the export
pub trait ExportSink<T: ExportRecord> {
    /// Writes a single record to the sink.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or I/O fails.
    fn write(&mut self, record: &T) -> Result<()>;

    /// Finalizes the export, writing any footers and flushing buffers.
    ///
    /// # Errors
    ///
    /// Returns an error if I/O fails.
    fn finalize(self: Box<Self>) -> Result<()>;
}
