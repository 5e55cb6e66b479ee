//! Receipt repository for JSON storage
//!
//! Manages loading and saving receipts to receipts.json, with an index of
//! receipt ids per committee.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::AmcError;
use crate::models::{CommitteeId, Receipt, ReceiptId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

/// File shape; rows are decoded one at a time
#[derive(Debug, Default, Serialize, Deserialize)]
struct ReceiptData {
    #[serde(default)]
    receipts: Vec<serde_json::Value>,
}

/// Repository for receipt persistence
pub struct ReceiptRepository {
    path: PathBuf,
    /// Receipts in the order they were stored
    data: RwLock<Vec<Receipt>>,
    /// Index: committee_id -> receipt ids
    by_committee: RwLock<HashMap<CommitteeId, Vec<ReceiptId>>>,
    /// Rows that did not decode as receipts; written back unchanged on save
    malformed: RwLock<Vec<serde_json::Value>>,
    /// Why the last load failed, if it did
    load_error: RwLock<Option<String>>,
}

impl ReceiptRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
            by_committee: RwLock::new(HashMap::new()),
            malformed: RwLock::new(Vec::new()),
            load_error: RwLock::new(None),
        }
    }

    /// Load receipts from disk and rebuild the committee index
    ///
    /// Rows that are not valid receipts (no id or date, wrong field types)
    /// are skipped with a warning. If the file itself cannot be read the
    /// repository stays empty and refuses reads and saves until a later
    /// load succeeds.
    pub fn load(&self) -> Result<(), AmcError> {
        let file_data: ReceiptData = match read_json(&self.path) {
            Ok(file_data) => file_data,
            Err(e) => {
                *self.load_error.write().map_err(lock_error)? = Some(e.to_string());
                return Err(e);
            }
        };

        let mut receipts = Vec::with_capacity(file_data.receipts.len());
        let mut malformed = Vec::new();
        for (index, row) in file_data.receipts.into_iter().enumerate() {
            match Receipt::deserialize(&row) {
                Ok(receipt) => receipts.push(receipt),
                Err(e) => {
                    tracing::warn!(index, error = %e, "skipping malformed receipt row");
                    malformed.push(row);
                }
            }
        }

        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_committee = self.by_committee.write().map_err(lock_error)?;

        by_committee.clear();
        for receipt in &receipts {
            match receipt.committee_id {
                Some(committee_id) => by_committee.entry(committee_id).or_default().push(receipt.id),
                None => tracing::warn!(receipt = %receipt.id, "receipt has no committee reference"),
            }
        }
        *data = receipts;
        *self.malformed.write().map_err(lock_error)? = malformed;
        *self.load_error.write().map_err(lock_error)? = None;

        tracing::debug!(count = data.len(), "loaded receipts");
        Ok(())
    }

    fn ensure_loaded(&self) -> Result<(), AmcError> {
        match self.load_error.read().map_err(lock_error)?.as_deref() {
            Some(reason) => Err(AmcError::Storage(format!(
                "Receipts are unavailable: {}",
                reason
            ))),
            None => Ok(()),
        }
    }

    /// Number of stored rows that were skipped on load
    pub fn malformed_count(&self) -> Result<usize, AmcError> {
        Ok(self.malformed.read().map_err(lock_error)?.len())
    }

    pub fn save(&self) -> Result<(), AmcError> {
        self.ensure_loaded()?;
        let data = self.data.read().map_err(lock_error)?;
        let malformed = self.malformed.read().map_err(lock_error)?;

        let mut rows = Vec::with_capacity(data.len() + malformed.len());
        for receipt in data.iter() {
            rows.push(serde_json::to_value(receipt)?);
        }
        rows.extend(malformed.iter().cloned());
        write_json_atomic(&self.path, &ReceiptData { receipts: rows })
    }

    pub fn get(&self, id: ReceiptId) -> Result<Option<Receipt>, AmcError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.iter().find(|r| r.id == id).cloned())
    }

    /// All receipts in stored order
    pub fn get_all(&self) -> Result<Vec<Receipt>, AmcError> {
        self.ensure_loaded()?;
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.clone())
    }

    pub fn get_by_committee(&self, committee_id: CommitteeId) -> Result<Vec<Receipt>, AmcError> {
        self.ensure_loaded()?;
        let data = self.data.read().map_err(lock_error)?;
        let by_committee = self.by_committee.read().map_err(lock_error)?;

        let ids = by_committee
            .get(&committee_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        Ok(data.iter().filter(|r| ids.contains(&r.id)).cloned().collect())
    }

    /// Find the receipt issued on a given slip (committee, book, number)
    pub fn find_slip(
        &self,
        committee_id: CommitteeId,
        book_number: &str,
        receipt_number: &str,
    ) -> Result<Option<Receipt>, AmcError> {
        Ok(self
            .get_by_committee(committee_id)?
            .into_iter()
            .find(|r| r.slip_matches(committee_id, book_number, receipt_number)))
    }

    /// Append a new receipt
    pub fn insert(&self, receipt: Receipt) -> Result<(), AmcError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_committee = self.by_committee.write().map_err(lock_error)?;

        if data.iter().any(|r| r.id == receipt.id) {
            return Err(AmcError::Duplicate {
                entity_type: "Receipt",
                identifier: receipt.id.to_string(),
            });
        }
        if let Some(committee_id) = receipt.committee_id {
            by_committee.entry(committee_id).or_default().push(receipt.id);
        }
        data.push(receipt);
        Ok(())
    }

    /// Remove a receipt, returning it if it existed
    pub fn remove(&self, id: ReceiptId) -> Result<Option<Receipt>, AmcError> {
        let mut data = self.data.write().map_err(lock_error)?;
        let mut by_committee = self.by_committee.write().map_err(lock_error)?;

        let Some(position) = data.iter().position(|r| r.id == id) else {
            return Ok(None);
        };
        let receipt = data.remove(position);
        if let Some(ids) = receipt.committee_id.and_then(|c| by_committee.get_mut(&c)) {
            ids.retain(|&rid| rid != id);
        }
        Ok(Some(receipt))
    }

    pub fn count(&self) -> Result<usize, AmcError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}
