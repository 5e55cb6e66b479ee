//! Session handling and session-level commands
//!
//! A `Session` bundles the logged-in principal with storage and settings.
//! It is built once in `main` and passed to every command handler.

use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use zeroize::Zeroizing;

use crate::access::{AccessScope, CommitteeMatcher};
use crate::backend::{Backend, Snapshot};
use crate::config::settings::Settings;
use crate::display::format_scope;
use crate::error::{AmcError, AmcResult};
use crate::models::{Capability, Principal};
use crate::reports::Overview;
use crate::services::AuthService;
use crate::storage::Storage;

use super::report::create_output;

/// Environment variable holding the password for non-interactive use
pub const PASSWORD_ENV: &str = "AMC_PASSWORD";

/// Read a password from `AMC_PASSWORD`, or prompt on the terminal
pub fn read_password(prompt: &str) -> AmcResult<Zeroizing<String>> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        return Ok(Zeroizing::new(password));
    }
    rpassword::prompt_password(prompt)
        .map(Zeroizing::new)
        .map_err(|e| AmcError::Io(format!("Failed to read password: {}", e)))
}

pub struct Session<'a> {
    pub storage: &'a Storage,
    pub settings: &'a Settings,
    pub matcher: CommitteeMatcher,
    pub principal: Principal,
}

impl<'a> Session<'a> {
    /// Log `username` in and open a session
    pub fn login(storage: &'a Storage, settings: &'a Settings, username: Option<&str>) -> AmcResult<Self> {
        let username = username.map(str::trim).filter(|u| !u.is_empty()).ok_or_else(|| {
            AmcError::Authentication("No user selected; pass --user or set AMC_USER".into())
        })?;

        let password = read_password(&format!("Password for {}: ", username))?;
        let profile = AuthService::new(storage).login(username, &password)?;

        Ok(Self::for_principal(storage, settings, profile.principal()))
    }

    pub fn for_principal(storage: &'a Storage, settings: &'a Settings, principal: Principal) -> Self {
        Self {
            storage,
            settings,
            matcher: CommitteeMatcher::with_extra_aliases(&settings.committee_aliases),
            principal,
        }
    }

    pub fn require(&self, capability: Capability) -> AmcResult<()> {
        self.principal.require(capability)
    }

    /// Fetch a snapshot for a view
    ///
    /// A failed fetch is reported and the view renders empty; it is not
    /// retried.
    pub fn view_snapshot(&self) -> Snapshot {
        match Snapshot::fetch(self.storage) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!(error = %e, "snapshot fetch failed");
                eprintln!("Warning: {}", e);
                Snapshot::default()
            }
        }
    }

    /// The principal's scope over a fresh snapshot
    pub fn view_scope(&self) -> AccessScope {
        self.view_snapshot().scope_for(&self.principal, &self.matcher)
    }
}

pub fn handle_whoami(session: &Session) -> AmcResult<()> {
    let profile = session
        .storage
        .fetch_profile(session.principal.user_id)?
        .ok_or_else(|| AmcError::user_not_found(session.principal.user_id.to_string()))?;

    println!("Username:   {}", profile.username);
    println!("Name:       {}", profile.display_name);
    println!("Role:       {} ({})", profile.role.description(), profile.role);
    println!(
        "Committee:  {}",
        profile.committee.as_deref().unwrap_or("(none)")
    );
    if let Some(email) = &profile.email {
        println!("Email:      {}", email);
    }
    Ok(())
}

pub fn handle_overview(session: &Session, output: Option<PathBuf>) -> AmcResult<()> {
    let scope = session.view_scope();
    let overview = Overview::generate(&scope, Local::now().date_naive());

    if let Some(path) = output {
        let mut writer = create_output(&path)?;
        overview.export_csv(&mut writer)?;
        writer
            .flush()
            .map_err(|e| AmcError::Export(e.to_string()))?;
        println!("Overview exported to: {}", path.display());
    } else {
        print!("{}", overview.format_terminal(&session.principal));
    }
    Ok(())
}

pub fn handle_scope(session: &Session) -> AmcResult<()> {
    let scope = session.view_scope();
    print!("{}", format_scope(&session.principal, &scope));
    Ok(())
}

pub fn handle_audit(session: &Session, limit: usize) -> AmcResult<()> {
    session.require(Capability::ManageUsers)?;

    let entries = session.storage.audit_log().read_recent(limit)?;
    if entries.is_empty() {
        println!("No audit entries.");
        return Ok(());
    }
    for entry in entries {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
