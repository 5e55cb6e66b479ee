//! Committee model
//!
//! An agricultural market committee. Receipts reference committees by id;
//! principals are assigned a committee by a free-text label.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CommitteeId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Committee {
    pub id: CommitteeId,

    /// Full display name, e.g. "Tuni Agricultural Market Committee"
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,

    /// Short code, e.g. "TUNI"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl Committee {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: CommitteeId::new(),
            name: name.into(),
            district: None,
            code: None,
        }
    }

    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = Some(district.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Check whether `identifier` names this committee by id, code or
    /// name (case-insensitive)
    pub fn is_identified_by(&self, identifier: &str) -> bool {
        let identifier = identifier.trim();
        if self.name.eq_ignore_ascii_case(identifier) {
            return true;
        }
        if self
            .code
            .as_deref()
            .is_some_and(|code| code.eq_ignore_ascii_case(identifier))
        {
            return true;
        }
        identifier
            .parse::<CommitteeId>()
            .is_ok_and(|id| id == self.id)
    }

    pub fn validate(&self) -> Result<(), CommitteeValidationError> {
        if self.name.trim().is_empty() {
            return Err(CommitteeValidationError::EmptyName);
        }
        if self.name.len() > 150 {
            return Err(CommitteeValidationError::NameTooLong(self.name.len()));
        }
        Ok(())
    }
}

impl fmt::Display for Committee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitteeValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CommitteeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Committee name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Committee name too long ({} chars, max 150)", len)
            }
        }
    }
}

impl std::error::Error for CommitteeValidationError {}
