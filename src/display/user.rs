//! User and committee display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::access::{AccessScope, ScopeStatus};
use crate::models::{Committee, Principal, UserProfile};
use crate::services::RoleCounts;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Committee")]
    committee: String,
    #[tabled(rename = "Email")]
    email: String,
}

pub fn format_user_list(users: &[UserProfile], counts: &RoleCounts) -> String {
    if users.is_empty() {
        return "No users found.\n".to_string();
    }

    let rows = users.iter().map(|u| UserRow {
        username: u.username.clone(),
        name: u.display_name.clone(),
        role: u.role.to_string(),
        committee: u.committee.clone().unwrap_or_else(|| "-".into()),
        email: u.email.clone().unwrap_or_default(),
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());

    let summary: Vec<String> = counts
        .0
        .iter()
        .map(|(role, count)| format!("{}: {}", role, count))
        .collect();

    format!("{}\n\n{} users ({})\n", table, counts.total(), summary.join(", "))
}

#[derive(Tabled)]
struct CommitteeRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "District")]
    district: String,
    #[tabled(rename = "Yours")]
    yours: String,
}

/// Committees with a marker on those the given label matches
pub fn format_committee_list(rows: &[(Committee, bool)]) -> String {
    if rows.is_empty() {
        return "No committees found. Run `amc init` to seed the defaults.\n".to_string();
    }

    let rows = rows.iter().map(|(c, matched)| CommitteeRow {
        code: c.code.clone().unwrap_or_default(),
        name: c.name.clone(),
        district: c.district.clone().unwrap_or_default(),
        yours: if *matched { "*".into() } else { String::new() },
    });
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}

/// Describe a principal's resolved access scope
pub fn format_scope(principal: &Principal, scope: &AccessScope) -> String {
    let mut output = String::new();
    output.push_str(&format!("User:       {}\n", principal.name));
    output.push_str(&format!("Role:       {}\n", principal.role.description()));
    output.push_str(&format!(
        "Assigned:   {}\n",
        principal.committee.as_deref().unwrap_or("(none)")
    ));

    let status = match scope.status {
        ScopeStatus::Unrestricted => "all committees",
        ScopeStatus::Assigned => "assigned committees",
        ScopeStatus::Unassigned => "none (no committee assigned)",
        ScopeStatus::NoListAccess => "none (verification only)",
    };
    output.push_str(&format!("Access:     {}\n", status));
    output.push_str(&format!("Receipts:   {}\n", scope.receipts.len()));

    if !scope.committees.is_empty() {
        output.push_str("Committees:\n");
        for committee in &scope.committees {
            output.push_str(&format!("  - {}\n", committee.name));
        }
    }

    output
}
