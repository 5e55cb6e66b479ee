//! Storage layer for AMC Receipts
//!
//! JSON file storage with atomic writes. Each repository holds its records
//! in memory behind an `RwLock` and persists to its own file under the data
//! directory.

pub mod committees;
pub mod file_io;
pub mod init;
pub mod receipts;
pub mod users;

pub use committees::CommitteeRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::{initialize_storage, DEFAULT_COMMITTEES};
pub use receipts::ReceiptRepository;
pub use users::UserRepository;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::AmcPaths;
use crate::error::{AmcError, AmcResult};

pub(crate) fn lock_error<T>(e: std::sync::PoisonError<T>) -> AmcError {
    AmcError::Storage(format!("Failed to acquire lock: {}", e))
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: AmcPaths,
    pub committees: CommitteeRepository,
    pub receipts: ReceiptRepository,
    pub users: UserRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: AmcPaths) -> AmcResult<Self> {
        paths.ensure_directories()?;

        Ok(Self {
            committees: CommitteeRepository::new(paths.committees_file()),
            receipts: ReceiptRepository::new(paths.receipts_file()),
            users: UserRepository::new(paths.users_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Load all data from disk
    ///
    /// Users must load. A committee or receipt file that cannot be read is
    /// logged and left for the fetch path to report, so views still render.
    pub fn load_all(&self) -> AmcResult<()> {
        self.users.load()?;
        if let Err(e) = self.committees.load() {
            tracing::error!(error = %e, "failed to load committees");
        }
        if let Err(e) = self.receipts.load() {
            tracing::error!(error = %e, "failed to load receipts");
        }
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    pub fn audit_log(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn log_create<T: Serialize>(
        &self,
        actor: Option<&str>,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> AmcResult<()> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity).by(actor))
    }

    /// Log an update; the change summary is derived from the two states
    pub fn log_update<T: Serialize>(
        &self,
        actor: Option<&str>,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> AmcResult<()> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.audit.log(
            &AuditEntry::update(entity_type, entity_id, entity_name, before, after, diff).by(actor),
        )
    }

    pub fn log_delete<T: Serialize>(
        &self,
        actor: Option<&str>,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> AmcResult<()> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity).by(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::{Role, UserProfile};
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = AmcPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_storage_creation() {
        let (temp_dir, storage) = create_test_storage();
        assert!(temp_dir.path().join("data").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_unreadable_receipts_do_not_block_load() {
        let (temp_dir, storage) = create_test_storage();
        std::fs::write(temp_dir.path().join("data").join("receipts.json"), "[[[").unwrap();

        storage.load_all().unwrap();
        assert!(storage.receipts.get_all().is_err());
        assert!(storage.committees.get_all().unwrap().is_empty());
        assert_eq!(storage.users.count().unwrap(), 0);
    }

    #[test]
    fn test_log_update_records_diff() {
        let (_temp_dir, storage) = create_test_storage();
        let before = UserProfile::new("deo", "Demo DEO", Role::DataEntryOperator);
        let mut after = before.clone();
        after.role = Role::Supervisor;

        storage
            .log_update(
                Some("jd"),
                EntityType::User,
                before.id.to_string(),
                Some("deo".into()),
                &before,
                &after,
            )
            .unwrap();

        let entries = storage.audit_log().read_all().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].operation, Operation::Update);
        assert!(entries[0]
            .diff_summary
            .as_deref()
            .unwrap()
            .contains("role: \"DEO\" -> \"Supervisor\""));
    }
}
