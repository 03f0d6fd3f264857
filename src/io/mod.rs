//! Import/export I/O subsystem.
//!
//! Turns loosely structured member and task data into normalized records.
//!
//! # Architecture
//!
//! - **Format adapters** ([`formats`]) sniff the payload and parse it into
//!   raw rows: JSON (with fence and prose extraction), CSV, or spreadsheet
//!   rows from a [`formats::spreadsheet::SheetDecoder`].
//! - **Field resolution** ([`fields`]) reads one logical field from whichever
//!   alias the source used.
//! - **Record kinds** ([`kinds`]) map raw rows into records and validate them.
//! - **Services** ([`services`]) orchestrate the pipeline and export.
//!
//! # Supported Formats
//!
//! | Format | Import | Export | Notes |
//! |--------|--------|--------|-------|
//! | JSON | ✓ | ✓ | Array, or object with a `members`/`tasks`/`data` array |
//! | CSV | ✓ | ✓ | Header line, comma delimiter, double-quote quoting |
//! | XLSX/XLS | ✓ | - | First sheet only |
//!
//! # Examples
//!
//! ```rust,ignore
//! use intake::io::{Confirmation, Decision, ImportInput, ImportService};
//! use intake::io::kinds::TaskKind;
//! use intake::models::Collection;
//!
//! let service = ImportService::default();
//! let outcome = service.analyze::<TaskKind>(ImportInput::file("plan.csv", bytes))?;
//! let confirmation = match outcome.decision() {
//!     Decision::NeedsConfirmation { .. } => ask(&outcome.confirmation_prompt(5)),
//!     _ => Confirmation::Approved,
//! };
//! let mut tasks = Collection::new();
//! service.commit(outcome, &mut tasks, confirmation)?;
//! ```

pub mod fields;
pub mod formats;
pub mod kinds;
pub mod services;
pub mod traits;
pub mod validation;

// Re-exports for convenience
pub use fields::{FieldAliases, RawRow};
pub use formats::{Format, ImportInput};
pub use kinds::{ImportKind, MemberKind, RecordKind, TaskKind};
pub use services::export::export_records;
pub use services::import::{Confirmation, Decision, ImportOptions, ImportOutcome, ImportService};
pub use traits::{ExportRecord, ExportSink};
pub use validation::ValidationError;
