//! Committee repository for JSON storage
//!
//! Manages loading and saving committees to committees.json. Committees
//! keep their stored order; the scope resolver preserves it.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::AmcError;
use crate::models::{Committee, CommitteeId};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct CommitteeData {
    pub(crate) committees: Vec<Committee>,
}

pub struct CommitteeRepository {
    path: PathBuf,
    data: RwLock<Vec<Committee>>,
    load_error: RwLock<Option<String>>,
}

impl CommitteeRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
            load_error: RwLock::new(None),
        }
    }

    /// Load committees; after a failed load, listing and saving are refused
    pub fn load(&self) -> Result<(), AmcError> {
        let file_data: CommitteeData = match read_json(&self.path) {
            Ok(file_data) => file_data,
            Err(e) => {
                *self.load_error.write().map_err(lock_error)? = Some(e.to_string());
                return Err(e);
            }
        };
        let mut data = self.data.write().map_err(lock_error)?;
        *data = file_data.committees;
        *self.load_error.write().map_err(lock_error)? = None;
        tracing::debug!(count = data.len(), "loaded committees");
        Ok(())
    }

    fn ensure_loaded(&self) -> Result<(), AmcError> {
        match self.load_error.read().map_err(lock_error)?.as_deref() {
            Some(reason) => Err(AmcError::Storage(format!(
                "Committees are unavailable: {}",
                reason
            ))),
            None => Ok(()),
        }
    }

    pub fn save(&self) -> Result<(), AmcError> {
        self.ensure_loaded()?;
        let data = self.data.read().map_err(lock_error)?;
        let file_data = CommitteeData {
            committees: data.clone(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: CommitteeId) -> Result<Option<Committee>, AmcError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.iter().find(|c| c.id == id).cloned())
    }

    /// Find a committee by id, code or name
    pub fn find(&self, identifier: &str) -> Result<Option<Committee>, AmcError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.iter().find(|c| c.is_identified_by(identifier)).cloned())
    }

    /// All committees in stored order
    pub fn get_all(&self) -> Result<Vec<Committee>, AmcError> {
        self.ensure_loaded()?;
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.clone())
    }

    /// Insert or update a committee; new committees are appended
    pub fn upsert(&self, committee: Committee) -> Result<(), AmcError> {
        let mut data = self.data.write().map_err(lock_error)?;
        match data.iter_mut().find(|c| c.id == committee.id) {
            Some(existing) => *existing = committee,
            None => data.push(committee),
        }
        Ok(())
    }

    pub fn count(&self) -> Result<usize, AmcError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CommitteeRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = CommitteeRepository::new(temp_dir.path().join("committees.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_preserves_order() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let tuni = Committee::new("Tuni Agricultural Market Committee");
        let kakinada = Committee::new("Kakinada Agricultural Market Committee");
        repo.upsert(tuni.clone()).unwrap();
        repo.upsert(kakinada.clone()).unwrap();

        let mut renamed = tuni.clone();
        renamed.name = "Tuni AMC".into();
        repo.upsert(renamed).unwrap();

        let all = repo.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Tuni AMC");
        assert_eq!(all[1].id, kakinada.id);
    }

    #[test]
    fn test_find_by_code() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Committee::new("Kakinada Agricultural Market Committee").with_code("KKD"))
            .unwrap();

        assert!(repo.find("kkd").unwrap().is_some());
        assert!(repo.find("TUNI").unwrap().is_none());
    }

    #[test]
    fn test_unreadable_file_blocks_listing() {
        let (temp_dir, repo) = create_test_repo();
        let path = temp_dir.path().join("committees.json");
        std::fs::write(&path, r#"{"committees": 7}"#).unwrap();

        assert!(repo.load().is_err());
        assert!(repo.get_all().is_err());
        assert!(repo.save().is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"{"committees": 7}"#);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let committee = Committee::new("Tuni AMC").with_district("East Godavari");
        repo.upsert(committee.clone()).unwrap();
        repo.save().unwrap();

        let repo2 = CommitteeRepository::new(temp_dir.path().join("committees.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(committee.id).unwrap(), Some(committee));
    }
}
