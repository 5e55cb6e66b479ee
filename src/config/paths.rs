//! Path management for AMC Receipts
//!
//! ## Path Resolution Order
//!
//! 1. `AMC_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `amc-receipts` as reported by
//!    `directories::ProjectDirs` (e.g. `~/.config/amc-receipts` on Linux)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::AmcError;

/// Manages all paths used by AMC Receipts
#[derive(Debug, Clone)]
pub struct AmcPaths {
    /// Base directory for all AMC Receipts data
    base_dir: PathBuf,
}

impl AmcPaths {
    /// Create a new AmcPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined for the
    /// current user.
    pub fn new() -> Result<Self, AmcError> {
        let base_dir = if let Ok(custom) = std::env::var("AMC_DATA_DIR") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create AmcPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Get the base directory
    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (`<base>/data/`)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn committees_file(&self) -> PathBuf {
        self.data_dir().join("committees.json")
    }

    pub fn receipts_file(&self) -> PathBuf {
        self.data_dir().join("receipts.json")
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir().join("users.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), AmcError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| AmcError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| AmcError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if the data store has been initialized (settings file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, AmcError> {
    ProjectDirs::from("in", "amc", "amc-receipts")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| AmcError::Config("Could not determine a home directory".into()))
}
