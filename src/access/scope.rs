//! Access scope resolution
//!
//! Given a principal's scope class and assigned committee label, and the
//! full committee and receipt lists, determine which committees and
//! receipts the principal may see. Pure: no I/O, no hidden state, and both
//! outputs preserve input order.

use std::collections::{HashMap, HashSet};

use crate::models::{Committee, CommitteeId, Principal, Receipt, ScopeClass};

use super::matcher::CommitteeMatcher;

/// Name shown for receipts whose committee cannot be resolved
pub const UNKNOWN_COMMITTEE: &str = "Unknown Committee";

/// How the scope was decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeStatus {
    /// Director-wide access to everything
    Unrestricted,
    /// Restricted to committees matching the assigned label
    Assigned,
    /// Committee-scoped role without a usable assignment; fails closed
    Unassigned,
    /// Role with no committee-scoped list access
    NoListAccess,
}

/// The committees and receipts visible to a principal
#[derive(Debug, Clone, PartialEq)]
pub struct AccessScope {
    pub status: ScopeStatus,
    pub committees: Vec<Committee>,
    pub receipts: Vec<Receipt>,
}

impl AccessScope {
    /// True when the principal has an assignment problem rather than an
    /// empty data set
    pub fn is_unassigned(&self) -> bool {
        self.status == ScopeStatus::Unassigned
    }

    pub fn is_empty(&self) -> bool {
        self.committees.is_empty() && self.receipts.is_empty()
    }
}

/// Committees visible to a scope class with the given label
pub fn visible_committees(
    class: ScopeClass,
    assigned_label: Option<&str>,
    all_committees: &[Committee],
    matcher: &CommitteeMatcher,
) -> Vec<Committee> {
    match class {
        ScopeClass::DirectorWide => all_committees.to_vec(),
        ScopeClass::SupervisorOrOperator => match assigned_label.map(str::trim) {
            Some(label) if !label.is_empty() => all_committees
                .iter()
                .filter(|c| matcher.matches(label, &c.name))
                .cloned()
                .collect(),
            _ => Vec::new(),
        },
        ScopeClass::Other => Vec::new(),
    }
}

/// Resolve the full scope for a scope class and label
pub fn resolve_scope(
    class: ScopeClass,
    assigned_label: Option<&str>,
    all_committees: &[Committee],
    all_receipts: &[Receipt],
    matcher: &CommitteeMatcher,
) -> AccessScope {
    match class {
        ScopeClass::DirectorWide => AccessScope {
            status: ScopeStatus::Unrestricted,
            committees: all_committees.to_vec(),
            receipts: all_receipts.to_vec(),
        },
        ScopeClass::Other => AccessScope {
            status: ScopeStatus::NoListAccess,
            committees: Vec::new(),
            receipts: Vec::new(),
        },
        ScopeClass::SupervisorOrOperator => {
            let has_label = assigned_label.is_some_and(|l| !l.trim().is_empty());
            if !has_label {
                return AccessScope {
                    status: ScopeStatus::Unassigned,
                    committees: Vec::new(),
                    receipts: Vec::new(),
                };
            }

            let committees = visible_committees(class, assigned_label, all_committees, matcher);
            let names = committee_names(all_committees);
            let allowed: HashSet<&str> = committees.iter().map(|c| c.name.as_str()).collect();

            let receipts = all_receipts
                .iter()
                .filter(|r| {
                    r.committee_id
                        .and_then(|id| names.get(&id))
                        .is_some_and(|name| allowed.contains(name))
                })
                .cloned()
                .collect();

            AccessScope {
                status: ScopeStatus::Assigned,
                committees,
                receipts,
            }
        }
    }
}

/// Resolve the scope of a logged-in principal
pub fn resolve_for(
    principal: &Principal,
    all_committees: &[Committee],
    all_receipts: &[Receipt],
    matcher: &CommitteeMatcher,
) -> AccessScope {
    resolve_scope(
        principal.role.scope_class(),
        principal.committee.as_deref(),
        all_committees,
        all_receipts,
        matcher,
    )
}

/// Map committee ids to names
pub fn committee_names(committees: &[Committee]) -> HashMap<CommitteeId, &str> {
    committees.iter().map(|c| (c.id, c.name.as_str())).collect()
}

/// The committee name a receipt resolves to, or `Unknown Committee`
pub fn receipt_committee_name<'a>(
    receipt: &Receipt,
    names: &HashMap<CommitteeId, &'a str>,
) -> &'a str {
    receipt
        .committee_id
        .and_then(|id| names.get(&id).copied())
        .unwrap_or(UNKNOWN_COMMITTEE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Fixture {
        committees: Vec<Committee>,
        receipts: Vec<Receipt>,
    }

    fn fixture() -> Fixture {
        let tuni = Committee::new("Tuni Agricultural Market Committee").with_district("East Godavari");
        let kakinada =
            Committee::new("Kakinada Agricultural Market Committee").with_district("East Godavari");
        let pune = Committee::new("Pune AMC").with_district("Pune");
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        let mut orphan = Receipt::new(tuni.id, date);
        orphan.committee_id = None;

        let receipts = vec![
            Receipt::new(tuni.id, date),
            Receipt::new(kakinada.id, date),
            Receipt::new(tuni.id, date),
            Receipt::new(pune.id, date),
            orphan,
            Receipt::new(CommitteeId::new(), date),
        ];

        Fixture {
            committees: vec![tuni, kakinada, pune],
            receipts,
        }
    }

    fn resolve(class: ScopeClass, label: Option<&str>, f: &Fixture) -> AccessScope {
        resolve_scope(
            class,
            label,
            &f.committees,
            &f.receipts,
            &CommitteeMatcher::default(),
        )
    }

    #[test]
    fn test_director_sees_everything_regardless_of_label() {
        let f = fixture();
        for label in [None, Some(""), Some("Tuni AMC"), Some("State Level")] {
            let scope = resolve(ScopeClass::DirectorWide, label, &f);
            assert_eq!(scope.status, ScopeStatus::Unrestricted);
            assert_eq!(scope.committees, f.committees);
            assert_eq!(scope.receipts, f.receipts);
        }
    }

    #[test]
    fn test_other_role_sees_nothing() {
        let f = fixture();
        let scope = resolve(ScopeClass::Other, Some("Tuni AMC"), &f);
        assert_eq!(scope.status, ScopeStatus::NoListAccess);
        assert!(scope.committees.is_empty());
        assert!(scope.receipts.is_empty());
    }

    #[test]
    fn test_missing_label_fails_closed() {
        let f = fixture();
        for label in [None, Some(""), Some("   ")] {
            let scope = resolve(ScopeClass::SupervisorOrOperator, label, &f);
            assert!(scope.is_unassigned());
            assert!(scope.is_empty());
        }
    }

    #[test]
    fn test_short_label_reaches_full_committee_name() {
        let f = fixture();
        let scope = resolve(ScopeClass::SupervisorOrOperator, Some("Tuni AMC"), &f);

        assert_eq!(scope.status, ScopeStatus::Assigned);
        assert_eq!(scope.committees.len(), 1);
        assert_eq!(scope.committees[0].name, "Tuni Agricultural Market Committee");
        assert_eq!(scope.receipts.len(), 2);
        assert!(scope
            .receipts
            .iter()
            .all(|r| r.committee_id == Some(f.committees[0].id)));
    }

    #[test]
    fn test_malformed_and_unknown_references_excluded() {
        let f = fixture();
        let scope = resolve(ScopeClass::SupervisorOrOperator, Some("Agricultural"), &f);

        // "Agricultural" is a substring of both East Godavari committees
        assert_eq!(scope.committees.len(), 2);
        assert_eq!(scope.receipts.len(), 3);
        assert!(scope.receipts.iter().all(|r| r.committee_id.is_some()));
    }

    #[test]
    fn test_assigned_with_no_match_is_not_unassigned() {
        let f = fixture();
        let scope = resolve(ScopeClass::SupervisorOrOperator, Some("Nagpur AMC"), &f);
        assert_eq!(scope.status, ScopeStatus::Assigned);
        assert!(scope.is_empty());
        assert!(!scope.is_unassigned());
    }

    #[test]
    fn test_resolution_is_idempotent_and_order_preserving() {
        let f = fixture();
        let first = resolve(ScopeClass::SupervisorOrOperator, Some("Agricultural"), &f);
        let second = resolve(ScopeClass::SupervisorOrOperator, Some("Agricultural"), &f);
        assert_eq!(first, second);

        let positions: Vec<usize> = first
            .receipts
            .iter()
            .map(|r| f.receipts.iter().position(|x| x.id == r.id).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_receipt_committee_name_falls_back() {
        let f = fixture();
        let names = committee_names(&f.committees);
        assert_eq!(
            receipt_committee_name(&f.receipts[0], &names),
            "Tuni Agricultural Market Committee"
        );
        assert_eq!(receipt_committee_name(&f.receipts[4], &names), UNKNOWN_COMMITTEE);
        assert_eq!(receipt_committee_name(&f.receipts[5], &names), UNKNOWN_COMMITTEE);
    }
}
