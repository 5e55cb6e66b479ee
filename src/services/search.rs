//! Receipt filtering and checkpost verification

use std::collections::HashMap;

use crate::access::{committee_names, receipt_committee_name};
use crate::models::{Committee, CommitteeId, Money, Receipt};

/// Narrows a list of visible receipts
#[derive(Debug, Clone, Default)]
pub struct ReceiptFilter {
    /// Case-insensitive substring over trader, payee, book number, receipt
    /// number and commodity
    pub search: Option<String>,
    /// Resolved committee name, exact but case-insensitive
    pub committee: Option<String>,
    /// Commodity, exact but case-insensitive
    pub commodity: Option<String>,
}

impl ReceiptFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn committee(mut self, name: impl Into<String>) -> Self {
        self.committee = Some(name.into());
        self
    }

    pub fn commodity(mut self, commodity: impl Into<String>) -> Self {
        self.commodity = Some(commodity.into());
        self
    }

    fn matches(&self, receipt: &Receipt, committee_name: &str) -> bool {
        if let Some(text) = active(&self.search) {
            let text = text.to_lowercase();
            let hit = [
                &receipt.trader_name,
                &receipt.payee_name,
                &receipt.book_number,
                &receipt.receipt_number,
                &receipt.commodity,
            ]
            .iter()
            .any(|field| field.to_lowercase().contains(&text));
            if !hit {
                return false;
            }
        }
        if let Some(committee) = active(&self.committee) {
            if !committee_name.eq_ignore_ascii_case(committee) {
                return false;
            }
        }
        if let Some(commodity) = active(&self.commodity) {
            if !receipt.commodity.trim().eq_ignore_ascii_case(commodity) {
                return false;
            }
        }
        true
    }

    /// Apply the filter, keeping input order
    pub fn apply(&self, receipts: &[Receipt], committees: &[Committee]) -> FilteredReceipts {
        let names = committee_names(committees);
        let rows: Vec<Receipt> = receipts
            .iter()
            .filter(|r| self.matches(r, receipt_committee_name(r, &names)))
            .cloned()
            .collect();
        let total_value = rows.iter().map(|r| r.value.to_money()).sum();

        FilteredReceipts {
            rows,
            total: receipts.len(),
            total_value,
        }
    }
}

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// The result of filtering: "showing X of Y"
#[derive(Debug, Clone)]
pub struct FilteredReceipts {
    pub rows: Vec<Receipt>,
    /// Number of receipts before filtering
    pub total: usize,
    /// Sum of the value of the shown rows
    pub total_value: Money,
}

impl FilteredReceipts {
    pub fn shown(&self) -> usize {
        self.rows.len()
    }
}

/// Outcome of a checkpost verification
#[derive(Debug, Clone, PartialEq)]
pub enum Verification {
    Genuine(Box<Receipt>),
    NotFound,
}

impl Verification {
    pub fn is_genuine(&self) -> bool {
        matches!(self, Self::Genuine(_))
    }
}

/// Look up a receipt slip by committee name, book number and receipt number
///
/// `committee` is matched against committee names, codes and ids.
pub fn verify_receipt(
    committees: &[Committee],
    receipts: &[Receipt],
    committee: &str,
    book_number: &str,
    receipt_number: &str,
) -> Verification {
    let candidates: HashMap<CommitteeId, &Committee> = committees
        .iter()
        .filter(|c| c.is_identified_by(committee))
        .map(|c| (c.id, c))
        .collect();

    receipts
        .iter()
        .find(|r| {
            candidates
                .keys()
                .any(|&id| r.slip_matches(id, book_number, receipt_number))
        })
        .map_or(Verification::NotFound, |r| {
            Verification::Genuine(Box::new(r.clone()))
        })
}
