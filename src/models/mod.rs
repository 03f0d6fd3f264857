//! Data models for intake.
//!
//! Canonical record shapes produced by the import pipeline, and the
//! collection type accepted records are merged into.

mod collection;
mod duration;
mod member;
mod task;

pub use collection::{Collection, Entry, RecordId};
pub use duration::{Duration, DurationUnit};
pub use member::{Member, MemberProfile};
pub use task::{Priority, Task};
