//! Role-based data access
//!
//! Decides which committees and receipts a principal may see. Fetching is
//! the caller's concern: everything here works on snapshots already held
//! in memory.

pub mod matcher;
pub mod scope;

pub use matcher::{CommitteeMatcher, MatchKind, DEFAULT_ALIAS_TOKENS};
pub use scope::{
    committee_names, receipt_committee_name, resolve_for, resolve_scope, visible_committees,
    AccessScope, ScopeStatus, UNKNOWN_COMMITTEE,
};
