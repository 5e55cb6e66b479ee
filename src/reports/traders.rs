//! Trader Report
//!
//! Per-trader activity across the visible receipts: how often each trader
//! appears, for how much, in which commodities, and when last.

use std::io::Write;

use chrono::NaiveDate;

use crate::error::AmcResult;
use crate::models::{Money, MonthKey, Receipt};

use super::aggregate::{by_month, trader_key, GroupSummary};
use super::analytics::export_error;

/// Number of traders ranked in the report
pub const TOP_TRADERS: usize = 10;

/// Activity of one trader
#[derive(Debug, Clone, PartialEq)]
pub struct TraderStats {
    pub name: String,
    pub receipt_count: usize,
    pub total_value: Money,
    pub total_quantity: f64,
    /// Distinct commodities in the order first traded
    pub commodities: Vec<String>,
    pub last_transaction: NaiveDate,
}

impl TraderStats {
    pub fn average_value(&self) -> Money {
        Money::average(self.total_value, self.receipt_count)
    }
}

#[derive(Debug, Clone)]
pub struct TraderReport {
    /// All traders, in the order first seen
    pub traders: Vec<TraderStats>,
    /// Month used for `active_in_month`
    pub month: MonthKey,
    /// Traders with at least one receipt in `month`
    pub active_in_month: usize,
}

impl TraderReport {
    pub fn generate(receipts: &[Receipt], month: MonthKey) -> Self {
        let mut traders: Vec<TraderStats> = Vec::new();

        for receipt in receipts {
            let name = trader_key(receipt);
            let commodity = receipt.commodity.trim();
            let stats = match traders.iter().position(|t| t.name == name) {
                Some(i) => &mut traders[i],
                None => {
                    traders.push(TraderStats {
                        name,
                        receipt_count: 0,
                        total_value: Money::zero(),
                        total_quantity: 0.0,
                        commodities: Vec::new(),
                        last_transaction: receipt.date,
                    });
                    let last = traders.len() - 1;
                    &mut traders[last]
                }
            };

            stats.receipt_count += 1;
            stats.total_value += receipt.value.to_money();
            stats.total_quantity += receipt.quantity.or_zero();
            if !commodity.is_empty() && !stats.commodities.iter().any(|c| c == commodity) {
                stats.commodities.push(commodity.to_string());
            }
            stats.last_transaction = stats.last_transaction.max(receipt.date);
        }

        let mut active: Vec<&str> = receipts
            .iter()
            .filter(|r| month.contains(r.date))
            .map(|r| r.trader_name.trim())
            .map(|n| if n.is_empty() { super::aggregate::UNKNOWN_TRADER } else { n })
            .collect();
        active.sort_unstable();
        active.dedup();

        Self {
            traders,
            month,
            active_in_month: active.len(),
        }
    }

    pub fn total_traders(&self) -> usize {
        self.traders.len()
    }

    /// Mean receipts per trader, rounded; zero when there are no traders
    pub fn average_receipts_per_trader(&self) -> usize {
        if self.traders.is_empty() {
            return 0;
        }
        let receipts: usize = self.traders.iter().map(|t| t.receipt_count).sum();
        (receipts as f64 / self.traders.len() as f64).round() as usize
    }

    /// The `n` traders with the highest total value, ties in first-seen order
    pub fn top(&self, n: usize) -> Vec<&TraderStats> {
        let mut ranked: Vec<&TraderStats> = self.traders.iter().collect();
        ranked.sort_by(|a, b| b.total_value.cmp(&a.total_value));
        ranked.truncate(n);
        ranked
    }

    /// Traders whose name contains `query` (case-insensitive)
    pub fn search(&self, query: &str) -> Vec<&TraderStats> {
        let query = query.trim().to_lowercase();
        self.traders
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&query))
            .collect()
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, limit: usize) -> String {
        let mut output = String::new();

        output.push_str("Trader Analytics\n");
        output.push_str(&"=".repeat(96));
        output.push('\n');
        output.push_str(&format!("Total Traders:              {}\n", self.total_traders()));
        output.push_str(&format!(
            "Active in {}:            {}\n",
            self.month.label(),
            self.active_in_month
        ));
        output.push_str(&format!(
            "Avg Receipts per Trader:    {}\n\n",
            self.average_receipts_per_trader()
        ));

        output.push_str(&format!(
            "{:<30} {:>8} {:>16} {:>16} {:>12}  {}\n",
            "Trader", "Receipts", "Total Value", "Avg Value", "Last", "Commodities"
        ));
        output.push_str(&"-".repeat(96));
        output.push('\n');

        for trader in self.top(limit) {
            output.push_str(&format!(
                "{:<30} {:>8} {:>16} {:>16} {:>12}  {}\n",
                trader.name,
                trader.receipt_count,
                trader.total_value.to_string(),
                trader.average_value().to_string(),
                trader.last_transaction.format("%Y-%m-%d").to_string(),
                trader.commodities.join(", ")
            ));
        }

        output
    }

    /// Export every trader to CSV
    pub fn export_csv<W: Write>(&self, writer: &mut W) -> AmcResult<()> {
        writeln!(
            writer,
            "Trader,Receipts,Total Value,Average Value,Quantity,Last Transaction,Commodities"
        )
        .map_err(export_error)?;

        for trader in &self.traders {
            writeln!(
                writer,
                "{},{},{:.2},{:.2},{:.2},{},{}",
                trader.name,
                trader.receipt_count,
                trader.total_value.as_rupees_f64(),
                trader.average_value().as_rupees_f64(),
                trader.total_quantity,
                trader.last_transaction,
                trader.commodities.join(";")
            )
            .map_err(export_error)?;
        }

        Ok(())
    }
}

/// Monthly totals for a single trader, earliest first
pub fn trader_monthly_trend(receipts: &[Receipt], trader: &str) -> Vec<GroupSummary<MonthKey>> {
    by_month(
        receipts
            .iter()
            .filter(|r| trader_key(r).eq_ignore_ascii_case(trader.trim())),
    )
}
