//! Audit trail for AMC Receipts
//!
//! Every committee, receipt and user write is appended to `audit.log` as a
//! JSON line carrying the acting user and the entity state around the
//! change. Password hashes never reach the log.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
