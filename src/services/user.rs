//! User management service
//!
//! Directors add, update and remove user profiles. Every operation here
//! requires the `ManageUsers` capability except the first-run bootstrap.

use chrono::Utc;

use crate::audit::EntityType;
use crate::error::{AmcError, AmcResult};
use crate::models::{Capability, Principal, Role, UserId, UserProfile};
use crate::storage::Storage;

use super::auth::hash_password;

/// Fields for a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub display_name: String,
    pub email: Option<String>,
    pub role: Role,
    pub committee: Option<String>,
    pub password: String,
}

/// Changes to an existing user; `None` leaves a field as it is
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    /// `Some("")` clears the assignment
    pub committee: Option<String>,
    pub password: Option<String>,
}

/// Number of users holding each role, in `Role::all()` order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleCounts(pub Vec<(Role, usize)>);

impl RoleCounts {
    pub fn get(&self, role: Role) -> usize {
        self.0
            .iter()
            .find(|(r, _)| *r == role)
            .map_or(0, |(_, count)| *count)
    }

    pub fn total(&self) -> usize {
        self.0.iter().map(|(_, count)| count).sum()
    }
}

pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create the first director account on an empty store
    pub fn bootstrap_admin(&self, username: &str, display_name: &str, password: &str) -> AmcResult<UserProfile> {
        if self.storage.users.count()? > 0 {
            return Err(AmcError::Validation(
                "Users already exist; ask a Joint Director to add accounts".into(),
            ));
        }
        self.insert(
            None,
            NewUser {
                username: username.into(),
                display_name: display_name.into(),
                email: None,
                role: Role::JointDirector,
                committee: None,
                password: password.into(),
            },
        )
    }

    pub fn add(&self, principal: &Principal, new_user: NewUser) -> AmcResult<UserProfile> {
        principal.require(Capability::ManageUsers)?;
        self.insert(Some(&principal.name), new_user)
    }

    fn insert(&self, actor: Option<&str>, new_user: NewUser) -> AmcResult<UserProfile> {
        let username = new_user.username.trim();
        if self.storage.users.get_by_username(username)?.is_some() {
            return Err(AmcError::Duplicate {
                entity_type: "User",
                identifier: username.to_string(),
            });
        }

        let mut user = UserProfile::new(username, new_user.display_name.trim(), new_user.role);
        user.email = new_user.email.filter(|e| !e.trim().is_empty());
        user.committee = new_user.committee.filter(|c| !c.trim().is_empty());
        user.validate()
            .map_err(|e| AmcError::Validation(e.to_string()))?;
        user.password_hash = Some(hash_password(&new_user.password)?);

        if user.role.scope_class() == crate::models::ScopeClass::SupervisorOrOperator
            && user.committee.is_none()
        {
            tracing::warn!(username = %user.username, role = %user.role, "user has no committee assignment and will see no receipts");
        }

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_create(
            actor,
            EntityType::User,
            user.id.to_string(),
            Some(user.username.clone()),
            &user,
        )?;

        Ok(user)
    }

    /// Find a user by username or id
    pub fn find(&self, identifier: &str) -> AmcResult<Option<UserProfile>> {
        if let Some(user) = self.storage.users.get_by_username(identifier)? {
            return Ok(Some(user));
        }
        match identifier.parse::<UserId>() {
            Ok(id) => self.storage.users.get(id),
            Err(_) => Ok(None),
        }
    }

    pub fn update(&self, principal: &Principal, identifier: &str, changes: UserUpdate) -> AmcResult<UserProfile> {
        principal.require(Capability::ManageUsers)?;

        let before = self
            .find(identifier)?
            .ok_or_else(|| AmcError::user_not_found(identifier))?;
        let mut user = before.clone();

        if let Some(name) = changes.display_name {
            user.display_name = name.trim().to_string();
        }
        if let Some(email) = changes.email {
            user.email = Some(email).filter(|e| !e.trim().is_empty());
        }
        if let Some(role) = changes.role {
            user.role = role;
        }
        if let Some(committee) = changes.committee {
            user.committee = Some(committee.trim().to_string()).filter(|c| !c.is_empty());
        }
        user.validate()
            .map_err(|e| AmcError::Validation(e.to_string()))?;
        if let Some(password) = changes.password {
            user.password_hash = Some(hash_password(&password)?);
        }

        if before.role == Role::JointDirector
            && user.role != Role::JointDirector
            && self.director_count()? <= 1
        {
            return Err(AmcError::Validation(
                "Cannot change the role of the last Joint Director".into(),
            ));
        }

        user.updated_at = Utc::now();
        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_update(
            Some(&principal.name),
            EntityType::User,
            user.id.to_string(),
            Some(user.username.clone()),
            &before,
            &user,
        )?;

        Ok(user)
    }

    pub fn delete(&self, principal: &Principal, identifier: &str) -> AmcResult<UserProfile> {
        principal.require(Capability::ManageUsers)?;

        let user = self
            .find(identifier)?
            .ok_or_else(|| AmcError::user_not_found(identifier))?;

        if user.id == principal.user_id {
            return Err(AmcError::Validation("You cannot delete your own account".into()));
        }

        self.storage.users.delete(user.id)?;
        self.storage.users.save()?;

        self.storage.log_delete(
            Some(&principal.name),
            EntityType::User,
            user.id.to_string(),
            Some(user.username.clone()),
            &user,
        )?;

        Ok(user)
    }

    pub fn list(&self, principal: &Principal) -> AmcResult<Vec<UserProfile>> {
        principal.require(Capability::ManageUsers)?;
        self.storage.users.get_all()
    }

    pub fn counts_by_role(&self, principal: &Principal) -> AmcResult<RoleCounts> {
        let users = self.list(principal)?;
        Ok(RoleCounts(
            Role::all()
                .iter()
                .map(|&role| (role, users.iter().filter(|u| u.role == role).count()))
                .collect(),
        ))
    }

    fn director_count(&self) -> AmcResult<usize> {
        Ok(self
            .storage
            .users
            .get_all()?
            .iter()
            .filter(|u| u.role == Role::JointDirector)
            .count())
    }
}
