//! Configuration module for AMC Receipts
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence (currency, date format, committee aliases)

pub mod paths;
pub mod settings;

pub use paths::AmcPaths;
pub use settings::Settings;
