//! Committee service

use crate::access::CommitteeMatcher;
use crate::audit::EntityType;
use crate::backend::Backend;
use crate::error::{AmcError, AmcResult};
use crate::models::{Capability, Committee, Principal};
use crate::storage::Storage;

pub struct CommitteeService<'a> {
    storage: &'a Storage,
}

impl<'a> CommitteeService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new committee
    pub fn add(
        &self,
        principal: &Principal,
        name: &str,
        district: Option<&str>,
        code: Option<&str>,
    ) -> AmcResult<Committee> {
        principal.require(Capability::ManageUsers)?;

        let mut committee = Committee::new(name.trim());
        committee.district = district.map(str::trim).filter(|d| !d.is_empty()).map(String::from);
        committee.code = code.map(str::trim).filter(|c| !c.is_empty()).map(String::from);

        committee
            .validate()
            .map_err(|e| AmcError::Validation(e.to_string()))?;

        let existing = self.storage.committees.get_all()?;
        let clash = existing.iter().find(|c| {
            c.is_identified_by(&committee.name)
                || committee.code.as_deref().is_some_and(|code| c.is_identified_by(code))
        });
        if let Some(clash) = clash {
            return Err(AmcError::Duplicate {
                entity_type: "Committee",
                identifier: clash.name.clone(),
            });
        }

        self.storage.committees.upsert(committee.clone())?;
        self.storage.committees.save()?;

        self.storage.log_create(
            Some(&principal.name),
            EntityType::Committee,
            committee.id.to_string(),
            Some(committee.name.clone()),
            &committee,
        )?;

        Ok(committee)
    }

    /// Committees in stored order, marked with whether `label` matches each
    pub fn list_with_matches(
        &self,
        label: Option<&str>,
        matcher: &CommitteeMatcher,
    ) -> AmcResult<Vec<(Committee, bool)>> {
        Ok(self
            .storage
            .fetch_committees()?
            .into_iter()
            .map(|c| {
                let matched = label.is_some_and(|l| matcher.matches(l, &c.name));
                (c, matched)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::AmcPaths;
    use crate::models::{Role, UserProfile};
    use tempfile::TempDir;

    fn director() -> Principal {
        UserProfile::new("jd", "Joint Director", Role::JointDirector).principal()
    }

    #[test]
    fn test_add_and_reject_duplicates() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(AmcPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let service = CommitteeService::new(&storage);

        let committee = service
            .add(&director(), "Peddapuram AMC", Some("East Godavari"), Some("PDP"))
            .unwrap();
        assert_eq!(committee.code.as_deref(), Some("PDP"));

        let err = service.add(&director(), "peddapuram amc", None, None).unwrap_err();
        assert!(matches!(err, AmcError::Duplicate { .. }));
        let err = service.add(&director(), "Other", None, Some("pdp")).unwrap_err();
        assert!(matches!(err, AmcError::Duplicate { .. }));
    }

    #[test]
    fn test_only_directors_add() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(AmcPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        let service = CommitteeService::new(&storage);
        let deo = UserProfile::new("deo", "DEO", Role::DataEntryOperator).principal();

        assert!(service.add(&deo, "Tuni AMC", None, None).unwrap_err().is_permission_denied());
    }

    #[test]
    fn test_list_with_matches() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(AmcPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        storage
            .committees
            .upsert(Committee::new("Tuni Agricultural Market Committee"))
            .unwrap();
        storage
            .committees
            .upsert(Committee::new("Kakinada Agricultural Market Committee"))
            .unwrap();

        let rows = CommitteeService::new(&storage)
            .list_with_matches(Some("Tuni AMC"), &CommitteeMatcher::default())
            .unwrap();
        let flags: Vec<bool> = rows.iter().map(|(_, m)| *m).collect();
        assert_eq!(flags, vec![true, false]);
    }
}
