//! Reports module for AMC Receipts
//!
//! Analytics, trader activity and the dashboard overview, all computed
//! from the receipts a principal is allowed to see.

pub mod aggregate;
pub mod analytics;
pub mod overview;
pub mod traders;

pub use aggregate::{GroupSummary, ReceiptTotals, UNKNOWN, UNKNOWN_TRADER};
pub use analytics::{AnalyticsReport, TOP_COMMODITIES};
pub use overview::Overview;
pub use traders::{trader_monthly_trend, TraderReport, TraderStats, TOP_TRADERS};
