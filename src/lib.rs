//! AMC Receipts - agricultural market committee receipt records
//!
//! This library provides role-based entry, verification and reporting of the
//! trade receipts issued by agricultural market committees. Every view is
//! computed from the receipts the logged-in principal is allowed to see.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Committees, receipts, users and value types
//! - `access`: Committee name matching and per-role access scope
//! - `storage`: JSON file storage layer
//! - `backend`: The data-access seam used by views and receipt entry
//! - `services`: Business logic layer
//! - `reports`: Analytics, trader and overview reports
//! - `export`: CSV, JSON and YAML export
//! - `audit`: Audit logging system
//!
//! # Example
//!
//! ```rust,ignore
//! use amc_receipts::config::{paths::AmcPaths, settings::Settings};
//!
//! let paths = AmcPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod access;
pub mod audit;
pub mod backend;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{AmcError, AmcResult};
