//! Service layer for AMC Receipts
//!
//! Business logic on top of storage: permission checks, validation and
//! audit logging for every write.

pub mod auth;
pub mod committee;
pub mod receipt;
pub mod search;
pub mod user;

pub use auth::{hash_password, verify_password, AuthService};
pub use committee::CommitteeService;
pub use receipt::{NewReceipt, ReceiptService};
pub use search::{verify_receipt, FilteredReceipts, ReceiptFilter, Verification};
pub use user::{NewUser, RoleCounts, UserService, UserUpdate};
