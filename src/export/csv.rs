//! CSV export of receipt lists
//!
//! One header row and one line per receipt. Fields are joined with commas
//! as they are; values containing commas are not quoted.

use std::io::Write;

use crate::access::{committee_names, receipt_committee_name};
use crate::error::{AmcError, AmcResult};
use crate::models::{Committee, Receipt};

pub const RECEIPT_CSV_HEADER: &str =
    "Date,Committee,Book Number,Receipt Number,Trader,Payee,Commodity,Quantity,Value,Fees Paid,Status";

/// Write `receipts` as CSV, resolving committee names from `committees`
pub fn export_receipts_csv<W: Write>(
    receipts: &[Receipt],
    committees: &[Committee],
    writer: &mut W,
) -> AmcResult<()> {
    let names = committee_names(committees);

    writeln!(writer, "{}", RECEIPT_CSV_HEADER).map_err(|e| AmcError::Export(e.to_string()))?;

    for receipt in receipts {
        let fields = [
            receipt.date.to_string(),
            receipt_committee_name(receipt, &names).to_string(),
            receipt.book_number.clone(),
            receipt.receipt_number.clone(),
            receipt.trader_name.clone(),
            receipt.payee_name.clone(),
            receipt.commodity.clone(),
            receipt.quantity.to_string(),
            receipt.value.to_string(),
            receipt.fees_paid.to_string(),
            receipt.status.to_string(),
        ];
        writeln!(writer, "{}", fields.join(",")).map_err(|e| AmcError::Export(e.to_string()))?;
    }

    tracing::debug!(rows = receipts.len(), "exported receipts to CSV");
    Ok(())
}
