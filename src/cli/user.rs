//! User and committee CLI commands

use clap::Subcommand;

use crate::display::{format_committee_list, format_user_list};
use crate::error::{AmcError, AmcResult};
use crate::models::Role;
use crate::services::{CommitteeService, NewUser, UserService, UserUpdate};

use super::session::Session;

/// Environment variable holding the password for a new account
pub const NEW_PASSWORD_ENV: &str = "AMC_NEW_PASSWORD";

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Add a user
    Add {
        username: String,
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Role (DEO, Officer, Supervisor, JD)
        #[arg(short, long)]
        role: Role,
        /// Assigned committee label
        #[arg(short, long)]
        committee: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        /// Initial password (prompted when omitted)
        #[arg(long, env = NEW_PASSWORD_ENV, hide_env_values = true)]
        password: Option<String>,
    },
    /// List users
    List,
    /// Update a user
    Update {
        /// Username or ID
        user: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        role: Option<Role>,
        /// New committee label (empty string clears it)
        #[arg(short, long)]
        committee: Option<String>,
        #[arg(short, long)]
        email: Option<String>,
        /// Prompt for a new password
        #[arg(long)]
        reset_password: bool,
    },
    /// Delete a user
    Delete {
        /// Username or ID
        user: String,
    },
}

/// Handle a user command
pub fn handle_user_command(session: &Session, cmd: UserCommands) -> AmcResult<()> {
    let service = UserService::new(session.storage);

    match cmd {
        UserCommands::Add {
            username,
            name,
            role,
            committee,
            email,
            password,
        } => {
            let password = match password {
                Some(p) => p,
                None => read_new_password(&username)?,
            };

            let user = service.add(
                &session.principal,
                NewUser {
                    username,
                    display_name: name,
                    email,
                    role,
                    committee,
                    password,
                },
            )?;

            println!("Added user: {} ({})", user.username, user.role);
            if let Some(committee) = &user.committee {
                println!("  Committee: {}", committee);
            }
        }

        UserCommands::List => {
            let users = service.list(&session.principal)?;
            let counts = service.counts_by_role(&session.principal)?;
            print!("{}", format_user_list(&users, &counts));
        }

        UserCommands::Update {
            user,
            name,
            role,
            committee,
            email,
            reset_password,
        } => {
            let password = if reset_password {
                Some(read_new_password(&user)?)
            } else {
                None
            };

            let changes = UserUpdate {
                display_name: name,
                email,
                role,
                committee,
                password,
            };
            let updated = service.update(&session.principal, &user, changes)?;
            println!("Updated user: {} ({})", updated.username, updated.role);
        }

        UserCommands::Delete { user } => {
            let deleted = service.delete(&session.principal, &user)?;
            println!("Deleted user: {}", deleted.username);
        }
    }

    Ok(())
}

fn read_new_password(username: &str) -> AmcResult<String> {
    if let Ok(password) = std::env::var(NEW_PASSWORD_ENV) {
        return Ok(password);
    }
    let first = rpassword::prompt_password(format!("New password for {}: ", username))
        .map_err(|e| AmcError::Io(format!("Failed to read password: {}", e)))?;
    let second = rpassword::prompt_password("Repeat password: ")
        .map_err(|e| AmcError::Io(format!("Failed to read password: {}", e)))?;
    if first != second {
        return Err(AmcError::Validation("Passwords do not match".into()));
    }
    Ok(first)
}

/// Committee subcommands
#[derive(Subcommand)]
pub enum CommitteeCommands {
    /// List committees, marking those your assignment matches
    List,
    /// Register a committee
    Add {
        name: String,
        #[arg(short, long)]
        district: Option<String>,
        /// Short code, e.g. TUN
        #[arg(short, long)]
        code: Option<String>,
    },
}

/// Handle a committee command
pub fn handle_committee_command(session: &Session, cmd: CommitteeCommands) -> AmcResult<()> {
    let service = CommitteeService::new(session.storage);

    match cmd {
        CommitteeCommands::List => {
            let rows = service
                .list_with_matches(session.principal.committee.as_deref(), &session.matcher)?;
            print!("{}", format_committee_list(&rows));
        }
        CommitteeCommands::Add {
            name,
            district,
            code,
        } => {
            let committee = service.add(
                &session.principal,
                &name,
                district.as_deref(),
                code.as_deref(),
            )?;
            println!("Added committee: {}", committee.name);
            println!("  ID: {}", committee.id);
        }
    }

    Ok(())
}

