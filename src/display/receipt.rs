//! Receipt display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::access::{committee_names, receipt_committee_name};
use crate::models::{Committee, Receipt};
use crate::services::{FilteredReceipts, Verification};

#[derive(Tabled)]
struct ReceiptRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Committee")]
    committee: String,
    #[tabled(rename = "Book/No.")]
    slip: String,
    #[tabled(rename = "Trader")]
    trader: String,
    #[tabled(rename = "Commodity")]
    commodity: String,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Status")]
    status: String,
}

/// Format a filtered receipt list as a table with a "showing X of Y" footer
pub fn format_receipt_list(filtered: &FilteredReceipts, committees: &[Committee], date_format: &str) -> String {
    if filtered.rows.is_empty() {
        return format!("No receipts found (0 of {}).\n", filtered.total);
    }

    let names = committee_names(committees);
    let rows = filtered.rows.iter().map(|r| ReceiptRow {
        date: r.date.format(date_format).to_string(),
        committee: truncate(receipt_committee_name(r, &names), 32),
        slip: format!("{}/{}", r.book_number, r.receipt_number),
        trader: truncate(&r.trader_name, 24),
        commodity: r.commodity.clone(),
        value: r.value.to_money().to_string(),
        status: r.status.to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::psql());

    format!(
        "{}\n\nShowing {} of {} receipts | Total value: {}\n",
        table,
        filtered.shown(),
        filtered.total,
        filtered.total_value
    )
}

/// Format every field of a receipt
pub fn format_receipt_details(receipt: &Receipt, committee_name: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Receipt:      {}\n", receipt.id));
    output.push_str(&format!("Committee:    {}\n", committee_name));
    output.push_str(&format!("Date:         {}\n", receipt.date.format("%Y-%m-%d")));
    output.push_str(&format!(
        "Book / No.:   {} / {}\n",
        receipt.book_number, receipt.receipt_number
    ));
    output.push_str(&format!("Trader:       {}\n", receipt.trader_name));
    if !receipt.trader_address.is_empty() {
        output.push_str(&format!("              {}\n", receipt.trader_address));
    }
    if !receipt.payee_name.is_empty() {
        output.push_str(&format!("Payee:        {}\n", receipt.payee_name));
        if !receipt.payee_address.is_empty() {
            output.push_str(&format!("              {}\n", receipt.payee_address));
        }
    }
    output.push_str(&format!("Commodity:    {}\n", receipt.commodity));
    output.push_str(&format!("Quantity:     {} {}\n", receipt.quantity, receipt.unit));
    output.push_str(&format!("Value:        {}\n", receipt.value.to_money()));
    output.push_str(&format!("Fees Paid:    {}\n", receipt.fees_paid.to_money()));
    if !receipt.nature_of_receipt.is_empty() {
        output.push_str(&format!("Nature:       {}\n", receipt.nature_of_receipt));
    }
    if let Some(vehicle) = &receipt.vehicle_number {
        output.push_str(&format!("Vehicle:      {}\n", vehicle));
    }
    if let Some(invoice) = &receipt.invoice_number {
        output.push_str(&format!("Invoice:      {}\n", invoice));
    }
    match &receipt.checkpost_location {
        Some(checkpost) => output.push_str(&format!(
            "Collected at: {} ({})\n",
            receipt.collection_location, checkpost
        )),
        None => output.push_str(&format!("Collected at: {}\n", receipt.collection_location)),
    }
    if !receipt.collected_by.is_empty() {
        let designation = receipt
            .designation
            .as_deref()
            .map(|d| format!(", {}", d))
            .unwrap_or_default();
        output.push_str(&format!("Collected by: {}{}\n", receipt.collected_by, designation));
    }
    output.push_str(&format!("Status:       {}\n", receipt.status));

    output
}

/// Format a checkpost verification result
pub fn format_verification(verification: &Verification, committee_name: &str) -> String {
    match verification {
        Verification::Genuine(receipt) => format!(
            "GENUINE: receipt found\n\n{}",
            format_receipt_details(receipt, committee_name)
        ),
        Verification::NotFound => {
            "NOT FOUND: no receipt matches this committee, book and receipt number\n".to_string()
        }
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Numeric;
    use crate::services::ReceiptFilter;
    use chrono::NaiveDate;

    fn sample() -> (Vec<Committee>, Vec<Receipt>) {
        let tuni = Committee::new("Tuni Agricultural Market Committee");
        let mut r = Receipt::new(tuni.id, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        r.book_number = "B-12".into();
        r.receipt_number = "0041".into();
        r.trader_name = "Sri Lakshmi Traders".into();
        r.commodity = "Rice".into();
        r.value = Numeric::from("62500");
        (vec![tuni], vec![r])
    }

    #[test]
    fn test_list_shows_rows_and_footer() {
        let (committees, receipts) = sample();
        let filtered = ReceiptFilter::new().apply(&receipts, &committees);

        let output = format_receipt_list(&filtered, &committees, "%d-%m-%Y");
        assert!(output.contains("15-01-2025"));
        assert!(output.contains("B-12/0041"));
        assert!(output.contains("Showing 1 of 1 receipts | Total value: ₹62500.00"));
    }

    #[test]
    fn test_empty_list() {
        let (committees, receipts) = sample();
        let filtered = ReceiptFilter::new().search("nothing").apply(&receipts, &committees);
        assert_eq!(
            format_receipt_list(&filtered, &committees, "%d-%m-%Y"),
            "No receipts found (0 of 1).\n"
        );
    }

    #[test]
    fn test_verification_output() {
        let (_, receipts) = sample();
        let genuine = Verification::Genuine(Box::new(receipts[0].clone()));
        assert!(format_verification(&genuine, "Tuni").starts_with("GENUINE"));
        assert!(format_verification(&Verification::NotFound, "Tuni").starts_with("NOT FOUND"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Kakinada", 10), "Kakinada");
        assert_eq!(truncate("Tuni Agricultural Market Committee", 10), "Tuni Ag...");
    }
}
