//!  Storage is organized through [record_storage::AttendanceStore].
//!  The basic idea is:
//!   - All records live in one json file, in the order they were added.
//!   - The file is read once, records are appended in memory and the whole file is rewritten
//!     on save.
//!   - Reading never fails. Broken data is skipped instead.

pub mod entities;
pub mod record_storage;
