//! Receipt service
//!
//! Receipt entry: resolves the committee within the principal's scope,
//! validates the form, rejects duplicate slips and submits once.

use chrono::{Local, NaiveDate};

use crate::access::{resolve_for, visible_committees, CommitteeMatcher};
use crate::audit::EntityType;
use crate::backend::{Backend, Snapshot};
use crate::error::{AmcError, AmcResult};
use crate::models::receipt::is_known_commodity;
use crate::models::{
    Capability, CollectionLocation, Committee, Numeric, Principal, Receipt, ReceiptId,
};
use crate::storage::Storage;

/// A receipt as entered on the form
#[derive(Debug, Clone, Default)]
pub struct NewReceipt {
    /// Committee name, code or id
    pub committee: String,
    /// Defaults to today
    pub date: Option<NaiveDate>,
    pub book_number: String,
    pub receipt_number: String,
    pub trader_name: String,
    pub trader_address: String,
    pub payee_name: String,
    pub payee_address: String,
    pub commodity: String,
    pub quantity: Numeric,
    pub unit: Option<String>,
    pub nature_of_receipt: String,
    pub value: Numeric,
    pub fees_paid: Numeric,
    pub vehicle_number: Option<String>,
    pub invoice_number: Option<String>,
    pub collection_location: CollectionLocation,
    pub checkpost_location: Option<String>,
    pub collected_by: String,
    pub designation: Option<String>,
}

impl NewReceipt {
    fn into_receipt(self, committee: &Committee, principal: &Principal) -> Receipt {
        let date = self.date.unwrap_or_else(|| Local::now().date_naive());
        let mut receipt = Receipt::new(committee.id, date);
        receipt.book_number = self.book_number.trim().to_string();
        receipt.receipt_number = self.receipt_number.trim().to_string();
        receipt.trader_name = self.trader_name.trim().to_string();
        receipt.trader_address = self.trader_address.trim().to_string();
        receipt.payee_name = self.payee_name.trim().to_string();
        receipt.payee_address = self.payee_address.trim().to_string();
        receipt.commodity = self.commodity.trim().to_string();
        receipt.quantity = self.quantity;
        if let Some(unit) = self.unit.filter(|u| !u.trim().is_empty()) {
            receipt.unit = unit;
        }
        receipt.nature_of_receipt = self.nature_of_receipt;
        receipt.value = self.value;
        receipt.fees_paid = self.fees_paid;
        receipt.vehicle_number = non_empty(self.vehicle_number);
        receipt.invoice_number = non_empty(self.invoice_number);
        receipt.collection_location = self.collection_location;
        receipt.checkpost_location = non_empty(self.checkpost_location);
        receipt.collected_by = self.collected_by;
        receipt.designation = non_empty(self.designation);
        receipt.created_by = Some(principal.user_id);
        receipt
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Service for receipt entry and lookup
pub struct ReceiptService<'a> {
    storage: &'a Storage,
    matcher: &'a CommitteeMatcher,
}

impl<'a> ReceiptService<'a> {
    pub fn new(storage: &'a Storage, matcher: &'a CommitteeMatcher) -> Self {
        Self { storage, matcher }
    }

    /// Submit a new receipt for the principal's committee
    ///
    /// Single-shot: on any error nothing has been written.
    pub fn submit(&self, principal: &Principal, form: NewReceipt) -> AmcResult<Receipt> {
        principal.require(Capability::SubmitReceipts)?;

        let committee = self.resolve_committee(principal, &form.committee)?;
        let receipt = form.into_receipt(&committee, principal);

        receipt
            .validate()
            .map_err(|e| AmcError::Validation(e.to_string()))?;

        if self
            .storage
            .receipts
            .find_slip(committee.id, &receipt.book_number, &receipt.receipt_number)?
            .is_some()
        {
            return Err(AmcError::Duplicate {
                entity_type: "Receipt",
                identifier: format!(
                    "{} book {} no. {}",
                    committee.name, receipt.book_number, receipt.receipt_number
                ),
            });
        }

        if !is_known_commodity(&receipt.commodity) {
            tracing::warn!(commodity = %receipt.commodity, "commodity is not in the standard list");
        }

        let receipt = self.storage.submit_receipt(receipt)?;

        // Already stored; an audit failure is only logged
        if let Err(e) = self.storage.log_create(
            Some(&principal.name),
            EntityType::Receipt,
            receipt.id.to_string(),
            Some(format!("{}/{}", receipt.book_number, receipt.receipt_number)),
            &receipt,
        ) {
            tracing::warn!(receipt = %receipt.id, error = %e, "failed to write audit entry");
        }

        tracing::info!(
            receipt = %receipt.id,
            committee = %committee.name,
            "receipt submitted"
        );
        Ok(receipt)
    }

    /// Find the committee named by `identifier` among those the principal
    /// may enter receipts for
    pub fn resolve_committee(&self, principal: &Principal, identifier: &str) -> AmcResult<Committee> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(AmcError::Validation("Receipt committee is required".into()));
        }

        let all = self.storage.fetch_committees()?;
        let visible = visible_committees(
            principal.role.scope_class(),
            principal.committee.as_deref(),
            &all,
            self.matcher,
        );

        if let Some(committee) = visible.into_iter().find(|c| c.is_identified_by(identifier)) {
            return Ok(committee);
        }

        if all.iter().any(|c| c.is_identified_by(identifier)) {
            Err(AmcError::Validation(format!(
                "Committee '{}' is outside your assigned committee",
                identifier
            )))
        } else {
            Err(AmcError::committee_not_found(identifier))
        }
    }

    /// Get a receipt visible to the principal
    pub fn get(&self, principal: &Principal, id: ReceiptId) -> AmcResult<Receipt> {
        principal.require(Capability::ListReceipts)?;

        let snapshot = Snapshot::fetch(self.storage)?;
        resolve_for(principal, &snapshot.committees, &snapshot.receipts, self.matcher)
            .receipts
            .into_iter()
            .find(|r| r.id == id)
            .ok_or_else(|| AmcError::receipt_not_found(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::AmcPaths;
    use crate::models::{Role, UserProfile};
    use tempfile::TempDir;

    struct Fixture {
        _temp_dir: TempDir,
        storage: Storage,
        matcher: CommitteeMatcher,
        tuni: Committee,
        kakinada: Committee,
    }

    fn fixture() -> Fixture {
        let temp_dir = TempDir::new().unwrap();
        let paths = AmcPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        let tuni = Committee::new("Tuni Agricultural Market Committee").with_code("TUN");
        let kakinada = Committee::new("Kakinada Agricultural Market Committee").with_code("KKD");
        storage.committees.upsert(tuni.clone()).unwrap();
        storage.committees.upsert(kakinada.clone()).unwrap();

        Fixture {
            _temp_dir: temp_dir,
            storage,
            matcher: CommitteeMatcher::default(),
            tuni,
            kakinada,
        }
    }

    fn tuni_operator() -> Principal {
        UserProfile::new("deo", "Demo DEO", Role::DataEntryOperator)
            .with_committee("Tuni AMC")
            .principal()
    }

    fn form(committee: &str, book: &str, number: &str) -> NewReceipt {
        NewReceipt {
            committee: committee.into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 15),
            book_number: book.into(),
            receipt_number: number.into(),
            trader_name: "Sri Lakshmi Traders".into(),
            commodity: "Rice".into(),
            quantity: Numeric::from("25"),
            value: Numeric::from("62500"),
            fees_paid: Numeric::from("625"),
            ..Default::default()
        }
    }

    #[test]
    fn test_submit_records_creator_and_audits() {
        let f = fixture();
        let service = ReceiptService::new(&f.storage, &f.matcher);
        let principal = tuni_operator();

        let receipt = service.submit(&principal, form("TUN", "B-1", "0001")).unwrap();

        assert_eq!(receipt.committee_id, Some(f.tuni.id));
        assert_eq!(receipt.created_by, Some(principal.user_id));
        assert_eq!(f.storage.receipts.count().unwrap(), 1);

        let audit = f.storage.audit_log().read_all().unwrap();
        assert_eq!(audit.len(), 1);
        assert_eq!(audit[0].entity_name.as_deref(), Some("B-1/0001"));
    }

    #[test]
    fn test_audit_failure_keeps_stored_receipt() {
        let f = fixture();
        std::fs::create_dir(f._temp_dir.path().join("audit.log")).unwrap();
        let service = ReceiptService::new(&f.storage, &f.matcher);
        let principal = tuni_operator();

        let receipt = service.submit(&principal, form("TUN", "B-1", "0001")).unwrap();
        assert_eq!(f.storage.receipts.get(receipt.id).unwrap(), Some(receipt));

        let err = service
            .submit(&principal, form("TUN", "B-1", "0001"))
            .unwrap_err();
        assert!(matches!(err, AmcError::Duplicate { .. }));
        assert_eq!(f.storage.receipts.count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_slip_rejected() {
        let f = fixture();
        let service = ReceiptService::new(&f.storage, &f.matcher);
        let principal = tuni_operator();

        service.submit(&principal, form("TUN", "B-1", "0001")).unwrap();
        let err = service
            .submit(&principal, form("Tuni Agricultural Market Committee", "b-1", "0001"))
            .unwrap_err();

        assert!(matches!(err, AmcError::Duplicate { .. }));
        assert_eq!(f.storage.receipts.count().unwrap(), 1);
    }

    #[test]
    fn test_committee_outside_scope_rejected() {
        let f = fixture();
        let service = ReceiptService::new(&f.storage, &f.matcher);

        let err = service
            .submit(&tuni_operator(), form(&f.kakinada.name, "K-1", "1"))
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .submit(&tuni_operator(), form("Peddapuram", "P-1", "1"))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_invalid_form_writes_nothing() {
        let f = fixture();
        let service = ReceiptService::new(&f.storage, &f.matcher);
        let mut bad = form("TUN", "B-1", "0002");
        bad.fees_paid = Numeric::from("-5");

        let err = service.submit(&tuni_operator(), bad).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(f.storage.receipts.count().unwrap(), 0);
        assert!(f.storage.audit_log().read_all().unwrap().is_empty());
    }

    #[test]
    fn test_only_operators_submit() {
        let f = fixture();
        let service = ReceiptService::new(&f.storage, &f.matcher);
        let director = UserProfile::new("jd", "Joint Director", Role::JointDirector).principal();

        let err = service.submit(&director, form("TUN", "B-1", "1")).unwrap_err();
        assert!(err.is_permission_denied());
    }

    #[test]
    fn test_get_respects_scope() {
        let f = fixture();
        let kakinada_receipt = Receipt::new(f.kakinada.id, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        f.storage.submit_receipt(kakinada_receipt.clone()).unwrap();
        let service = ReceiptService::new(&f.storage, &f.matcher);

        let err = service.get(&tuni_operator(), kakinada_receipt.id).unwrap_err();
        assert!(err.is_not_found());

        let director = UserProfile::new("jd", "Joint Director", Role::JointDirector).principal();
        assert!(service.get(&director, kakinada_receipt.id).is_ok());
    }
}
