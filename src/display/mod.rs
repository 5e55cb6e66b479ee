//! Display formatting for terminal output

pub mod receipt;
pub mod user;

pub use receipt::{format_receipt_details, format_receipt_list, format_verification};
pub use user::{format_committee_list, format_scope, format_user_list};
