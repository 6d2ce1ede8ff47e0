//! Audit logging
//!
//! Records every transaction creation (manual or imported) in an append-only
//! line-delimited JSON log kept per user.
//!
//! - `AuditEntry`: one created transaction, with timestamp, operation, user and
//!   a snapshot of the stored record.
//! - `AuditLogger`: appends to one user's log and reads that user's entries back.

mod entry;
mod logger;

pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
