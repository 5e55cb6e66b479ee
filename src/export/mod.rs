//! Export module for AMC Receipts
//!
//! - CSV: the visible (optionally filtered) receipt list
//! - JSON / YAML: full snapshot of the visible committees and receipts

pub mod csv;
pub mod json;
pub mod yaml;

pub use csv::{export_receipts_csv, RECEIPT_CSV_HEADER};
pub use json::{export_full_json, ExportMetadata, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
