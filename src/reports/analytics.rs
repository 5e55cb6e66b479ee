//! Analytics Report
//!
//! Totals, value by district, the top commodities and the monthly trend for
//! the receipts a principal can see.

use std::io::Write;

use crate::error::{AmcError, AmcResult};
use crate::models::{Committee, MonthKey, Receipt};

use super::aggregate::{by_commodity, by_district, by_month, top_n, GroupSummary, ReceiptTotals};

/// Number of commodities shown in the analytics report
pub const TOP_COMMODITIES: usize = 10;

#[derive(Debug, Clone)]
pub struct AnalyticsReport {
    pub totals: ReceiptTotals,
    pub districts: Vec<GroupSummary<String>>,
    /// Highest-value commodities, at most `TOP_COMMODITIES`
    pub top_commodities: Vec<GroupSummary<String>>,
    /// Chronological
    pub monthly: Vec<GroupSummary<MonthKey>>,
}

impl AnalyticsReport {
    pub fn generate(receipts: &[Receipt], committees: &[Committee]) -> Self {
        Self::generate_with_limit(receipts, committees, TOP_COMMODITIES)
    }

    pub fn generate_with_limit(receipts: &[Receipt], committees: &[Committee], top: usize) -> Self {
        Self {
            totals: ReceiptTotals::from_receipts(receipts),
            districts: by_district(receipts, committees),
            top_commodities: top_n(by_commodity(receipts), top),
            monthly: by_month(receipts),
        }
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self) -> String {
        let mut output = String::new();

        output.push_str("Receipt Analytics\n");
        output.push_str(&"=".repeat(72));
        output.push('\n');
        output.push_str(&format!("Total Receipts:  {}\n", self.totals.count));
        output.push_str(&format!("Total Value:     {}\n", self.totals.total_value));
        output.push_str(&format!("Total Quantity:  {:.2}\n", self.totals.total_quantity));
        output.push_str(&format!("Fees Collected:  {}\n", self.totals.total_fees));
        output.push_str(&format!("Average Value:   {}\n", self.totals.average_value));

        section(&mut output, "By District", "District", &self.districts, |k| k.clone());
        section(
            &mut output,
            "Top Commodities",
            "Commodity",
            &self.top_commodities,
            |k| k.clone(),
        );
        section(&mut output, "Monthly Trend", "Month", &self.monthly, MonthKey::label);

        output
    }

    /// Export the grouped rows to CSV
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> AmcResult<()> {
        writeln!(writer, "Section,Key,Count,Value,Quantity").map_err(export_error)?;

        let rows = self
            .districts
            .iter()
            .map(|g| ("District", g.key.clone(), g))
            .chain(self.top_commodities.iter().map(|g| ("Commodity", g.key.clone(), g)));
        for (section, key, group) in rows {
            write_row(writer, section, &key, group)?;
        }
        for group in &self.monthly {
            write_row(writer, "Month", &group.key.to_string(), group)?;
        }

        writeln!(
            writer,
            "Total,All,{},{:.2},{:.2}",
            self.totals.count,
            self.totals.total_value.as_rupees_f64(),
            self.totals.total_quantity
        )
        .map_err(export_error)?;

        Ok(())
    }
}

fn section<K>(
    output: &mut String,
    title: &str,
    heading: &str,
    groups: &[GroupSummary<K>],
    label: impl Fn(&K) -> String,
) {
    output.push_str(&format!("\n{}\n", title));
    output.push_str(&"-".repeat(72));
    output.push('\n');
    if groups.is_empty() {
        output.push_str("  (no receipts)\n");
        return;
    }
    output.push_str(&format!(
        "{:<40} {:>8} {:>20}\n",
        heading, "Count", "Value"
    ));
    for group in groups {
        output.push_str(&format!(
            "{:<40} {:>8} {:>20}\n",
            label(&group.key),
            group.count,
            group.total_value.to_string()
        ));
    }
}

fn write_row<W: Write, K>(
    writer: &mut W,
    section: &str,
    key: &str,
    group: &GroupSummary<K>,
) -> AmcResult<()> {
    writeln!(
        writer,
        "{},{},{},{:.2},{:.2}",
        section,
        key,
        group.count,
        group.total_value.as_rupees_f64(),
        group.total_quantity
    )
    .map_err(export_error)
}

pub(crate) fn export_error(e: std::io::Error) -> AmcError {
    AmcError::Export(e.to_string())
}
