//! Command handlers module.
//!
//! - `io.rs`: check, import and export commands

mod io;

pub use io::{ConfirmMode, cmd_check, cmd_export, cmd_import};
