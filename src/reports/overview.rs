//! Dashboard overview
//!
//! The summary cards shown after login, computed over the principal's
//! visible receipts.

use std::io::Write;

use chrono::{Local, NaiveDate};

use crate::access::{AccessScope, ScopeStatus};
use crate::error::AmcResult;
use crate::models::{Money, MonthKey, Principal, Receipt};

use super::analytics::export_error;

#[derive(Debug, Clone, PartialEq)]
pub struct Overview {
    pub total_receipts: usize,
    pub this_month: usize,
    pub total_value: Money,
    /// Receipts created on `today`, in local time
    pub entered_today: usize,
    pub committees: usize,
    pub status: ScopeStatus,
}

impl Overview {
    pub fn generate(scope: &AccessScope, today: NaiveDate) -> Self {
        let month = MonthKey::from_date(today);
        let receipts: &[Receipt] = &scope.receipts;

        Self {
            total_receipts: receipts.len(),
            this_month: receipts.iter().filter(|r| month.contains(r.date)).count(),
            total_value: receipts.iter().map(|r| r.value.to_money()).sum(),
            entered_today: receipts
                .iter()
                .filter(|r| r.created_at.with_timezone(&Local).date_naive() == today)
                .count(),
            committees: scope.committees.len(),
            status: scope.status,
        }
    }

    pub fn format_terminal(&self, principal: &Principal) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Welcome, {} ({})\n",
            principal.name,
            principal.role.description()
        ));
        if let Some(committee) = &principal.committee {
            output.push_str(&format!("Committee: {}\n", committee));
        }
        output.push_str(&"=".repeat(48));
        output.push('\n');

        match self.status {
            ScopeStatus::Unassigned => {
                output.push_str(
                    "No committee is assigned to your account, so no receipts are visible.\n\
                     Ask a Joint Director to assign one.\n",
                );
                return output;
            }
            ScopeStatus::NoListAccess => {
                output.push_str("Your role verifies receipts; use `amc receipt verify`.\n");
                return output;
            }
            ScopeStatus::Unrestricted | ScopeStatus::Assigned => {}
        }

        output.push_str(&format!("Committees:        {}\n", self.committees));
        output.push_str(&format!("Total Receipts:    {}\n", self.total_receipts));
        output.push_str(&format!("This Month:        {}\n", self.this_month));
        output.push_str(&format!(
            "Total Value:       ₹{:.2}L\n",
            self.total_value.as_lakhs()
        ));
        output.push_str(&format!("Entered Today:     {}\n", self.entered_today));

        output
    }

    /// Export the summary cards as `Metric,Value` rows
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> AmcResult<()> {
        writeln!(writer, "Metric,Value").map_err(export_error)?;
        writeln!(writer, "Committees,{}", self.committees).map_err(export_error)?;
        writeln!(writer, "Total Receipts,{}", self.total_receipts).map_err(export_error)?;
        writeln!(writer, "This Month,{}", self.this_month).map_err(export_error)?;
        writeln!(writer, "Total Value,{:.2}", self.total_value.as_rupees_f64())
            .map_err(export_error)?;
        writeln!(writer, "Entered Today,{}", self.entered_today).map_err(export_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Committee, Numeric, Role, UserProfile};
    use chrono::{DateTime, TimeZone, Utc};

    fn local_time(date: (i32, u32, u32), hour: u32, minute: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(date.0, date.1, date.2, hour, minute, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn scope_with(receipts: Vec<Receipt>) -> AccessScope {
        AccessScope {
            status: ScopeStatus::Unrestricted,
            committees: vec![Committee::new("Tuni AMC")],
            receipts,
        }
    }

    fn receipt(date: (i32, u32, u32), created: (i32, u32, u32), value: f64) -> Receipt {
        let mut r = Receipt::new(
            crate::models::CommitteeId::new(),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        );
        r.value = Numeric::from(value);
        r.created_at = local_time(created, 10, 0);
        r
    }

    #[test]
    fn test_overview_counts() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let scope = scope_with(vec![
            receipt((2025, 3, 1), (2025, 3, 2), 150_000.0),
            receipt((2025, 3, 14), (2025, 3, 14), 50_000.0),
            receipt((2025, 2, 28), (2025, 3, 14), 25_000.0),
        ]);

        let overview = Overview::generate(&scope, today);
        assert_eq!(overview.total_receipts, 3);
        assert_eq!(overview.this_month, 2);
        assert_eq!(overview.entered_today, 2);
        assert_eq!(overview.total_value, Money::from_rupees(225_000));
    }

    #[test]
    fn test_entered_today_uses_local_day() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let mut receipts = vec![
            receipt((2025, 3, 14), (2025, 3, 14), 1.0),
            receipt((2025, 3, 14), (2025, 3, 14), 1.0),
            receipt((2025, 3, 14), (2025, 3, 13), 1.0),
            receipt((2025, 3, 14), (2025, 3, 15), 1.0),
        ];
        receipts[0].created_at = local_time((2025, 3, 14), 0, 30);
        receipts[1].created_at = local_time((2025, 3, 14), 23, 30);
        receipts[2].created_at = local_time((2025, 3, 13), 23, 30);
        receipts[3].created_at = local_time((2025, 3, 15), 0, 30);

        let overview = Overview::generate(&scope_with(receipts), today);
        assert_eq!(overview.entered_today, 2);
    }

    #[test]
    fn test_unassigned_message() {
        let scope = AccessScope {
            status: ScopeStatus::Unassigned,
            committees: Vec::new(),
            receipts: Vec::new(),
        };
        let principal = UserProfile::new("deo", "Demo DEO", Role::DataEntryOperator).principal();

        let output = Overview::generate(&scope, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .format_terminal(&principal);
        assert!(output.contains("No committee is assigned"));
    }

    #[test]
    fn test_value_in_lakhs() {
        let scope = scope_with(vec![receipt((2025, 1, 1), (2025, 1, 1), 250_000.0)]);
        let principal = UserProfile::new("jd", "Joint Director", Role::JointDirector).principal();

        let output = Overview::generate(&scope, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap())
            .format_terminal(&principal);
        assert!(output.contains("₹2.50L"));
    }

    #[test]
    fn test_export_csv() {
        let scope = scope_with(vec![receipt((2025, 1, 1), (2025, 1, 1), 1_500.5)]);
        let overview = Overview::generate(&scope, NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        let mut out = Vec::new();
        overview.export_csv(&mut out).unwrap();
        let csv = String::from_utf8(out).unwrap();

        assert_eq!(csv.lines().count(), 6);
        assert!(csv.contains("Total Value,1500.50"));
    }
}
