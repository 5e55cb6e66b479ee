//! Users, roles and the session principal
//!
//! Roles form a closed set. Each maps to exactly one `ScopeClass`, which is
//! all the access scope resolver needs to know about it, and to a fixed set
//! of capabilities that gate the commands a user may run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::UserId;

/// The four user roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Data entry operator
    #[serde(rename = "DEO")]
    DataEntryOperator,
    /// Checkpost officer
    #[serde(rename = "Officer")]
    CheckpostOfficer,
    #[serde(rename = "Supervisor")]
    Supervisor,
    /// Joint director
    #[serde(rename = "JD")]
    JointDirector,
}

/// How a role's committee visibility is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeClass {
    /// Sees every committee and receipt
    DirectorWide,
    /// Sees only the committees matching the assigned label
    SupervisorOrOperator,
    /// No committee-scoped list access
    Other,
}

/// Actions gated by role
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    SubmitReceipts,
    VerifyReceipts,
    ListReceipts,
    ViewAnalytics,
    Export,
    ManageUsers,
}

impl Capability {
    /// Verb phrase used in permission errors
    pub fn action(&self) -> &'static str {
        match self {
            Self::SubmitReceipts => "submit receipts",
            Self::VerifyReceipts => "verify receipts",
            Self::ListReceipts => "list receipts",
            Self::ViewAnalytics => "view analytics",
            Self::Export => "export receipts",
            Self::ManageUsers => "manage users and committees",
        }
    }
}

impl Role {
    pub fn all() -> &'static [Role] {
        &[
            Role::DataEntryOperator,
            Role::CheckpostOfficer,
            Role::Supervisor,
            Role::JointDirector,
        ]
    }

    pub fn scope_class(&self) -> ScopeClass {
        match self {
            Role::JointDirector => ScopeClass::DirectorWide,
            Role::Supervisor | Role::DataEntryOperator => ScopeClass::SupervisorOrOperator,
            Role::CheckpostOfficer => ScopeClass::Other,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        use Capability::*;
        match self {
            Role::DataEntryOperator => {
                matches!(capability, SubmitReceipts | ListReceipts | ViewAnalytics)
            }
            Role::CheckpostOfficer => matches!(capability, VerifyReceipts),
            Role::Supervisor => matches!(capability, ListReceipts | ViewAnalytics | Export),
            Role::JointDirector => !matches!(capability, SubmitReceipts | VerifyReceipts),
        }
    }

    /// Short label as stored by the backend
    pub fn label(&self) -> &'static str {
        match self {
            Role::DataEntryOperator => "DEO",
            Role::CheckpostOfficer => "Officer",
            Role::Supervisor => "Supervisor",
            Role::JointDirector => "JD",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Role::DataEntryOperator => "Data Entry Operator",
            Role::CheckpostOfficer => "Checkpost Officer",
            Role::Supervisor => "Supervisor",
            Role::JointDirector => "Joint Director",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', '_', ' '], "").as_str() {
            "deo" | "dataentryoperator" | "operator" => Ok(Role::DataEntryOperator),
            "officer" | "checkpostofficer" => Ok(Role::CheckpostOfficer),
            "supervisor" => Ok(Role::Supervisor),
            "jd" | "jointdirector" | "director" => Ok(Role::JointDirector),
            _ => Err(format!(
                "Unknown role '{}'. Expected one of: DEO, Officer, Supervisor, JD",
                s
            )),
        }
    }
}

/// A stored user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,

    /// Login name (unique, case-insensitive)
    pub username: String,

    pub display_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    pub role: Role,

    /// Assigned committee label; directors usually have none
    #[serde(default)]
    pub committee: Option<String>,

    /// Argon2 PHC string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    pub fn new(username: impl Into<String>, display_name: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username: username.into(),
            display_name: display_name.into(),
            email: None,
            role,
            committee: None,
            password_hash: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_committee(mut self, committee: impl Into<String>) -> Self {
        self.committee = Some(committee.into());
        self
    }

    pub fn matches_username(&self, username: &str) -> bool {
        self.username.eq_ignore_ascii_case(username.trim())
    }

    /// Build the session principal for this profile
    pub fn principal(&self) -> Principal {
        Principal {
            user_id: self.id,
            name: self.display_name.clone(),
            role: self.role,
            committee: self.committee.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if self.username.chars().any(char::is_whitespace) {
            return Err(UserValidationError::WhitespaceInUsername);
        }
        if self.display_name.trim().is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(UserValidationError::InvalidEmail(email.clone()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    WhitespaceInUsername,
    EmptyName,
    InvalidEmail(String),
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "Username cannot be empty"),
            Self::WhitespaceInUsername => write!(f, "Username cannot contain whitespace"),
            Self::EmptyName => write!(f, "Display name cannot be empty"),
            Self::InvalidEmail(email) => write!(f, "Invalid email address: {}", email),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// The logged-in user, passed explicitly to everything that needs it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: UserId,
    pub name: String,
    pub role: Role,
    pub committee: Option<String>,
}

impl Principal {
    pub fn can(&self, capability: Capability) -> bool {
        self.role.can(capability)
    }

    /// Return a permission error unless the role grants `capability`
    pub fn require(&self, capability: Capability) -> crate::error::AmcResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(crate::error::AmcError::PermissionDenied {
                role: self.role.label().to_string(),
                action: capability.action(),
            })
        }
    }
}
