//! Core data models for AMC Receipts
//!
//! Committees, receipts and users as the backend stores them, plus the
//! value types used to aggregate them.

pub mod committee;
pub mod ids;
pub mod money;
pub mod numeric;
pub mod period;
pub mod receipt;
pub mod user;

pub use committee::Committee;
pub use ids::{CommitteeId, ReceiptId, UserId};
pub use money::Money;
pub use numeric::Numeric;
pub use period::MonthKey;
pub use receipt::{CollectionLocation, Receipt, ReceiptStatus, COMMODITIES};
pub use user::{Capability, Principal, Role, ScopeClass, UserProfile};
