//! Import and export service implementations.
//!
//! Orchestrates format parsing, mapping, validation and merging.

pub mod export;
pub mod import;

pub use export::{create_export_sink, export_format, export_records};
pub use import::{Confirmation, Decision, ImportOptions, ImportOutcome, ImportService};
