//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod export;
pub mod receipt;
pub mod report;
pub mod session;
pub mod user;

pub use export::{handle_export_command, ExportCommands, ExportFormat};
pub use receipt::{handle_receipt_command, ReceiptCommands};
pub use report::{handle_report_command, ReportCommands};
pub use session::{handle_audit, handle_overview, handle_scope, handle_whoami, read_password, Session};
pub use user::{handle_committee_command, handle_user_command, CommitteeCommands, UserCommands};
