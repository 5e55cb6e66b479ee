//! Backend access
//!
//! The `Backend` trait is the seam between views and wherever committees,
//! receipts and profiles live. `Storage` implements it over the JSON store.
//! A view takes a `Snapshot` (both collections fetched concurrently) and
//! runs the scope resolver over it.

use std::thread;

use crate::access::{resolve_for, AccessScope, CommitteeMatcher};
use crate::error::{AmcError, AmcResult};
use crate::models::{Committee, Principal, Receipt, UserId, UserProfile};
use crate::storage::Storage;

/// Reads and writes against the receipt backend
pub trait Backend: Sync {
    fn fetch_committees(&self) -> AmcResult<Vec<Committee>>;

    fn fetch_receipts(&self) -> AmcResult<Vec<Receipt>>;

    fn fetch_profile(&self, id: UserId) -> AmcResult<Option<UserProfile>>;

    /// Persist a new receipt, returning it as stored
    fn submit_receipt(&self, receipt: Receipt) -> AmcResult<Receipt>;
}

impl Backend for Storage {
    fn fetch_committees(&self) -> AmcResult<Vec<Committee>> {
        self.committees.get_all().map_err(|e| AmcError::Fetch {
            what: "committees",
            reason: e.to_string(),
        })
    }

    fn fetch_receipts(&self) -> AmcResult<Vec<Receipt>> {
        self.receipts.get_all().map_err(|e| AmcError::Fetch {
            what: "receipts",
            reason: e.to_string(),
        })
    }

    fn fetch_profile(&self, id: UserId) -> AmcResult<Option<UserProfile>> {
        self.users.get(id).map_err(|e| AmcError::Fetch {
            what: "user profile",
            reason: e.to_string(),
        })
    }

    fn submit_receipt(&self, receipt: Receipt) -> AmcResult<Receipt> {
        self.receipts
            .insert(receipt.clone())
            .map_err(|e| AmcError::Submit(e.to_string()))?;

        if let Err(e) = self.receipts.save() {
            // Keep memory consistent with the file when the write fails
            let _ = self.receipts.remove(receipt.id);
            return Err(AmcError::Submit(e.to_string()));
        }

        Ok(receipt)
    }
}

/// Committees and receipts as read together for one view
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub committees: Vec<Committee>,
    pub receipts: Vec<Receipt>,
}

impl Snapshot {
    /// Fetch committees and receipts as two concurrent reads
    ///
    /// Either read failing fails the snapshot; there is no partial result.
    pub fn fetch<B: Backend + ?Sized>(backend: &B) -> AmcResult<Self> {
        let (committees, receipts) = thread::scope(|s| {
            let committees = s.spawn(|| backend.fetch_committees());
            let receipts = s.spawn(|| backend.fetch_receipts());
            (join(committees, "committees"), join(receipts, "receipts"))
        });

        let snapshot = Self {
            committees: committees?,
            receipts: receipts?,
        };
        tracing::debug!(
            committees = snapshot.committees.len(),
            receipts = snapshot.receipts.len(),
            "fetched snapshot"
        );
        Ok(snapshot)
    }

    /// Resolve what `principal` may see in this snapshot
    pub fn scope_for(&self, principal: &Principal, matcher: &CommitteeMatcher) -> AccessScope {
        resolve_for(principal, &self.committees, &self.receipts, matcher)
    }
}

fn join<T>(
    handle: thread::ScopedJoinHandle<'_, AmcResult<T>>,
    what: &'static str,
) -> AmcResult<T> {
    handle.join().unwrap_or_else(|_| {
        Err(AmcError::Fetch {
            what,
            reason: "reader thread panicked".into(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::ScopeStatus;
    use crate::config::paths::AmcPaths;
    use crate::models::{CommitteeId, Role};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    struct FailingReceipts {
        committees: Vec<Committee>,
    }

    impl Backend for FailingReceipts {
        fn fetch_committees(&self) -> AmcResult<Vec<Committee>> {
            Ok(self.committees.clone())
        }

        fn fetch_receipts(&self) -> AmcResult<Vec<Receipt>> {
            Err(AmcError::Fetch {
                what: "receipts",
                reason: "connection reset".into(),
            })
        }

        fn fetch_profile(&self, _id: UserId) -> AmcResult<Option<UserProfile>> {
            Ok(None)
        }

        fn submit_receipt(&self, _receipt: Receipt) -> AmcResult<Receipt> {
            Err(AmcError::Submit("read-only".into()))
        }
    }

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AmcPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_snapshot_fetches_both_collections() {
        let (_temp_dir, storage) = create_test_storage();
        let tuni = Committee::new("Tuni Agricultural Market Committee");
        storage.committees.upsert(tuni.clone()).unwrap();
        storage
            .submit_receipt(Receipt::new(tuni.id, NaiveDate::from_ymd_opt(2025, 1, 2).unwrap()))
            .unwrap();

        let snapshot = Snapshot::fetch(&storage).unwrap();
        assert_eq!(snapshot.committees.len(), 1);
        assert_eq!(snapshot.receipts.len(), 1);
    }

    #[test]
    fn test_snapshot_fails_without_partial_result() {
        let backend = FailingReceipts {
            committees: vec![Committee::new("Tuni AMC")],
        };

        let err = Snapshot::fetch(&backend).unwrap_err();
        assert!(matches!(err, AmcError::Fetch { what: "receipts", .. }));
    }

    #[test]
    fn test_unreadable_receipts_file_fails_fetch_not_load() {
        let (temp_dir, storage) = create_test_storage();
        let path = temp_dir.path().join("data").join("receipts.json");
        std::fs::write(&path, r#"{"receipts": "oops"}"#).unwrap();
        storage.load_all().unwrap();

        let err = Snapshot::fetch(&storage).unwrap_err();
        assert!(matches!(err, AmcError::Fetch { what: "receipts", .. }));

        let receipt = Receipt::new(CommitteeId::new(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert!(matches!(storage.submit_receipt(receipt), Err(AmcError::Submit(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"receipts": "oops"}"#);
    }

    #[test]
    fn test_submit_persists_receipt() {
        let (temp_dir, storage) = create_test_storage();
        let receipt = Receipt::new(CommitteeId::new(), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        let stored = storage.submit_receipt(receipt.clone()).unwrap();
        assert_eq!(stored, receipt);

        let reopened = Storage::new(AmcPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        reopened.load_all().unwrap();
        assert_eq!(reopened.fetch_receipts().unwrap(), vec![receipt]);
    }

    #[test]
    fn test_scope_for_unassigned_supervisor() {
        let snapshot = Snapshot {
            committees: vec![Committee::new("Tuni Agricultural Market Committee")],
            receipts: Vec::new(),
        };
        let principal = UserProfile::new("sup", "Supervisor", Role::Supervisor).principal();

        let scope = snapshot.scope_for(&principal, &CommitteeMatcher::default());
        assert_eq!(scope.status, ScopeStatus::Unassigned);
        assert!(scope.is_empty());
    }
}
