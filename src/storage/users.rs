//! User repository for JSON storage

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::AmcError;
use crate::models::{UserId, UserProfile};

use super::file_io::{read_json, write_json_atomic};
use super::lock_error;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<UserProfile>,
}

pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, UserProfile>>,
}

impl UserRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), AmcError> {
        let file_data: UserData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(lock_error)?;
        data.clear();
        for user in file_data.users {
            data.insert(user.id, user);
        }
        Ok(())
    }

    pub fn save(&self) -> Result<(), AmcError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        write_json_atomic(&self.path, &UserData { users })
    }

    pub fn get(&self, id: UserId) -> Result<Option<UserProfile>, AmcError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.get(&id).cloned())
    }

    /// Look a user up by login name (case-insensitive)
    pub fn get_by_username(&self, username: &str) -> Result<Option<UserProfile>, AmcError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.values().find(|u| u.matches_username(username)).cloned())
    }

    /// All users sorted by username
    pub fn get_all(&self) -> Result<Vec<UserProfile>, AmcError> {
        let data = self.data.read().map_err(lock_error)?;
        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.username.to_lowercase().cmp(&b.username.to_lowercase()));
        Ok(users)
    }

    pub fn upsert(&self, user: UserProfile) -> Result<(), AmcError> {
        let mut data = self.data.write().map_err(lock_error)?;
        data.insert(user.id, user);
        Ok(())
    }

    pub fn delete(&self, id: UserId) -> Result<bool, AmcError> {
        let mut data = self.data.write().map_err(lock_error)?;
        Ok(data.remove(&id).is_some())
    }

    pub fn count(&self) -> Result<usize, AmcError> {
        let data = self.data.read().map_err(lock_error)?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, UserRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = UserRepository::new(temp_dir.path().join("users.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_get_by_username_case_insensitive() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(UserProfile::new("Supervisor1", "Demo Supervisor", Role::Supervisor))
            .unwrap();

        assert!(repo.get_by_username("supervisor1").unwrap().is_some());
        assert!(repo.get_by_username("jd").unwrap().is_none());
    }

    #[test]
    fn test_save_reload_and_delete() {
        let (temp_dir, repo) = create_test_repo();
        let user = UserProfile::new("deo", "Demo DEO", Role::DataEntryOperator).with_committee("Tuni AMC");
        let id = user.id;
        repo.upsert(user).unwrap();
        repo.save().unwrap();

        let repo2 = UserRepository::new(temp_dir.path().join("users.json"));
        repo2.load().unwrap();
        let loaded = repo2.get(id).unwrap().unwrap();
        assert_eq!(loaded.committee.as_deref(), Some("Tuni AMC"));

        assert!(repo2.delete(id).unwrap());
        assert_eq!(repo2.count().unwrap(), 0);
    }
}
