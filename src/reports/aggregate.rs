//! Aggregation helpers shared by the reports
//!
//! Receipts carry their numbers in stored form; everything here parses them
//! on the way in, and anything unparseable counts as zero without stopping
//! the aggregation.

use std::collections::HashMap;
use std::hash::Hash;

use crate::models::{Committee, CommitteeId, Money, MonthKey, Receipt};

/// Key for receipts whose district or commodity is unknown
pub const UNKNOWN: &str = "Unknown";

/// Key for receipts without a trader name
pub const UNKNOWN_TRADER: &str = "Unknown Trader";

/// Totals for one group of receipts
#[derive(Debug, Clone, PartialEq)]
pub struct GroupSummary<K> {
    pub key: K,
    pub count: usize,
    pub total_value: Money,
    pub total_quantity: f64,
}

impl<K> GroupSummary<K> {
    fn new(key: K) -> Self {
        Self {
            key,
            count: 0,
            total_value: Money::zero(),
            total_quantity: 0.0,
        }
    }

    fn add(&mut self, receipt: &Receipt) {
        self.count += 1;
        self.total_value += receipt.value.to_money();
        self.total_quantity += receipt.quantity.or_zero();
    }

    pub fn average_value(&self) -> Money {
        Money::average(self.total_value, self.count)
    }
}

/// Partition receipts by `key_fn`, keeping groups in the order their keys
/// were first seen
pub fn group_by<'r, K, F, I>(receipts: I, mut key_fn: F) -> Vec<GroupSummary<K>>
where
    K: Eq + Hash + Clone,
    F: FnMut(&Receipt) -> K,
    I: IntoIterator<Item = &'r Receipt>,
{
    let mut groups: Vec<GroupSummary<K>> = Vec::new();
    let mut index: HashMap<K, usize> = HashMap::new();

    for receipt in receipts {
        let key = key_fn(receipt);
        let slot = *index.entry(key.clone()).or_insert_with(|| {
            groups.push(GroupSummary::new(key));
            groups.len() - 1
        });
        groups[slot].add(receipt);
    }

    groups
}

/// The `n` groups with the highest total value
///
/// Groups with equal totals keep their input order.
pub fn top_n<K>(mut groups: Vec<GroupSummary<K>>, n: usize) -> Vec<GroupSummary<K>> {
    groups.sort_by(|a, b| b.total_value.cmp(&a.total_value));
    groups.truncate(n);
    groups
}

/// District of the receipt's committee
pub fn district_key(receipt: &Receipt, committees: &HashMap<CommitteeId, &Committee>) -> String {
    receipt
        .committee_id
        .and_then(|id| committees.get(&id))
        .and_then(|c| c.district.as_deref())
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

pub fn commodity_key(receipt: &Receipt) -> String {
    non_empty_or(&receipt.commodity, UNKNOWN)
}

pub fn trader_key(receipt: &Receipt) -> String {
    non_empty_or(&receipt.trader_name, UNKNOWN_TRADER)
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

pub fn by_district(receipts: &[Receipt], committees: &[Committee]) -> Vec<GroupSummary<String>> {
    let lookup: HashMap<CommitteeId, &Committee> = committees.iter().map(|c| (c.id, c)).collect();
    group_by(receipts, |r| district_key(r, &lookup))
}

pub fn by_commodity(receipts: &[Receipt]) -> Vec<GroupSummary<String>> {
    group_by(receipts, commodity_key)
}

pub fn by_trader(receipts: &[Receipt]) -> Vec<GroupSummary<String>> {
    group_by(receipts, trader_key)
}

/// Monthly totals, earliest month first
pub fn by_month<'r, I>(receipts: I) -> Vec<GroupSummary<MonthKey>>
where
    I: IntoIterator<Item = &'r Receipt>,
{
    let mut months = group_by(receipts, |r| MonthKey::from_date(r.date));
    months.sort_by_key(|g| g.key);
    months
}

/// Scalar totals over a set of receipts
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptTotals {
    pub count: usize,
    pub total_value: Money,
    pub total_quantity: f64,
    pub total_fees: Money,
    /// `total_value / count`, zero when there are no receipts
    pub average_value: Money,
}

impl ReceiptTotals {
    pub fn from_receipts(receipts: &[Receipt]) -> Self {
        let total_value: Money = receipts.iter().map(|r| r.value.to_money()).sum();
        Self {
            count: receipts.len(),
            total_value,
            total_quantity: receipts.iter().map(|r| r.quantity.or_zero()).sum(),
            total_fees: receipts.iter().map(|r| r.fees_paid.to_money()).sum(),
            average_value: Money::average(total_value, receipts.len()),
        }
    }
}
