//! JSON export
//!
//! A full snapshot of the committees and receipts a principal can see,
//! with schema versioning and summary metadata.

use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::access::AccessScope;
use crate::error::{AmcError, AmcResult};
use crate::models::{Committee, Money, Principal, Receipt};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FullExport {
    pub schema_version: String,

    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// Display name of the exporting user
    pub exported_by: String,

    pub committees: Vec<Committee>,

    pub receipts: Vec<Receipt>,

    pub metadata: ExportMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub committee_count: usize,
    pub receipt_count: usize,
    /// Sum of receipt values in paise
    pub total_value: Money,
    pub earliest_receipt: Option<NaiveDate>,
    pub latest_receipt: Option<NaiveDate>,
}

impl FullExport {
    /// Build an export of everything in `scope`
    pub fn from_scope(scope: &AccessScope, principal: &Principal) -> Self {
        let receipts = &scope.receipts;
        let metadata = ExportMetadata {
            committee_count: scope.committees.len(),
            receipt_count: receipts.len(),
            total_value: receipts.iter().map(|r| r.value.to_money()).sum(),
            earliest_receipt: receipts.iter().map(|r| r.date).min(),
            latest_receipt: receipts.iter().map(|r| r.date).max(),
        };

        Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            exported_by: principal.name.clone(),
            committees: scope.committees.clone(),
            receipts: receipts.clone(),
            metadata,
        }
    }
}

pub fn export_full_json<W: Write>(export: &FullExport, writer: &mut W) -> AmcResult<()> {
    serde_json::to_writer_pretty(&mut *writer, export)
        .map_err(|e| AmcError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| AmcError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::ScopeStatus;
    use crate::models::{Numeric, Role, UserProfile};

    fn scope() -> AccessScope {
        let tuni = Committee::new("Tuni Agricultural Market Committee");
        let receipts = [(2025, 3, 1, 100.0), (2024, 11, 20, 250.5)]
            .iter()
            .map(|&(y, m, d, v)| {
                let mut r = Receipt::new(tuni.id, NaiveDate::from_ymd_opt(y, m, d).unwrap());
                r.value = Numeric::from(v);
                r
            })
            .collect();
        AccessScope {
            status: ScopeStatus::Unrestricted,
            committees: vec![tuni],
            receipts,
        }
    }

    #[test]
    fn test_metadata() {
        let principal = UserProfile::new("jd", "Joint Director", Role::JointDirector).principal();
        let export = FullExport::from_scope(&scope(), &principal);

        assert_eq!(export.schema_version, EXPORT_SCHEMA_VERSION);
        assert_eq!(export.exported_by, "Joint Director");
        assert_eq!(export.metadata.receipt_count, 2);
        assert_eq!(export.metadata.total_value, Money::from_paise(35050));
        assert_eq!(export.metadata.earliest_receipt, NaiveDate::from_ymd_opt(2024, 11, 20));
        assert_eq!(export.metadata.latest_receipt, NaiveDate::from_ymd_opt(2025, 3, 1));
    }

    #[test]
    fn test_json_parses_back() {
        let principal = UserProfile::new("jd", "Joint Director", Role::JointDirector).principal();
        let export = FullExport::from_scope(&scope(), &principal);

        let mut out = Vec::new();
        export_full_json(&export, &mut out).unwrap();
        let parsed: FullExport = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.receipts, export.receipts);
        assert_eq!(parsed.committees, export.committees);
    }
}
