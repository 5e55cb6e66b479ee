//! Receipt CLI commands
//!
//! Entry, listing, lookup and checkpost verification of receipts.

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};

use crate::access::{committee_names, receipt_committee_name};
use crate::display::{format_receipt_details, format_receipt_list, format_verification};
use crate::error::{AmcError, AmcResult};
use crate::models::{Capability, CollectionLocation, Numeric, ReceiptId};
use crate::services::{verify_receipt, NewReceipt, ReceiptFilter, ReceiptService};

use super::session::Session;

/// Where the fee was collected
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LocationArg {
    Office,
    Checkpost,
    Other,
}

impl From<LocationArg> for CollectionLocation {
    fn from(arg: LocationArg) -> Self {
        match arg {
            LocationArg::Office => CollectionLocation::Office,
            LocationArg::Checkpost => CollectionLocation::Checkpost,
            LocationArg::Other => CollectionLocation::Other,
        }
    }
}

/// Receipt subcommands
#[derive(Subcommand)]
pub enum ReceiptCommands {
    /// Enter a new receipt
    Add {
        /// Committee name, code or id (defaults to your only committee)
        #[arg(short, long)]
        committee: Option<String>,
        /// Receipt date (YYYY-MM-DD, defaults to today)
        #[arg(short, long)]
        date: Option<String>,
        /// Book number
        #[arg(short, long)]
        book: String,
        /// Receipt number within the book
        #[arg(short, long)]
        number: String,
        /// Trader name
        #[arg(short, long)]
        trader: String,
        #[arg(long, default_value = "")]
        trader_address: String,
        #[arg(long, default_value = "")]
        payee: String,
        #[arg(long, default_value = "")]
        payee_address: String,
        /// Commodity traded
        #[arg(long)]
        commodity: String,
        /// Quantity traded
        #[arg(long)]
        quantity: String,
        /// Unit of quantity (defaults to quintals)
        #[arg(long)]
        unit: Option<String>,
        /// Trade value in rupees
        #[arg(long)]
        value: String,
        /// Market fee collected in rupees
        #[arg(short, long)]
        fees: String,
        #[arg(long, default_value = "")]
        nature: String,
        #[arg(long)]
        vehicle: Option<String>,
        #[arg(long)]
        invoice: Option<String>,
        #[arg(long, value_enum, default_value = "office")]
        location: LocationArg,
        /// Checkpost name when collected at a checkpost
        #[arg(long)]
        checkpost: Option<String>,
        /// Name of the collecting official
        #[arg(long, default_value = "")]
        collected_by: String,
        #[arg(long)]
        designation: Option<String>,
    },
    /// List receipts in your scope
    List {
        /// Free-text search over trader, payee, book, number and commodity
        #[arg(short, long)]
        search: Option<String>,
        /// Committee name
        #[arg(short, long)]
        committee: Option<String>,
        #[arg(long)]
        commodity: Option<String>,
    },
    /// Show a receipt
    Show {
        /// Receipt ID
        id: String,
    },
    /// Verify a receipt slip presented at a checkpost
    Verify {
        /// Committee name, code or id
        #[arg(short, long)]
        committee: String,
        #[arg(short, long)]
        book: String,
        #[arg(short, long)]
        number: String,
    },
}

/// Handle a receipt command
pub fn handle_receipt_command(session: &Session, cmd: ReceiptCommands) -> AmcResult<()> {
    match cmd {
        ReceiptCommands::Add {
            committee,
            date,
            book,
            number,
            trader,
            trader_address,
            payee,
            payee_address,
            commodity,
            quantity,
            unit,
            value,
            fees,
            nature,
            vehicle,
            invoice,
            location,
            checkpost,
            collected_by,
            designation,
        } => {
            let committee = match committee {
                Some(c) => c,
                None => default_committee(session)?,
            };
            let date = date.as_deref().map(parse_date).transpose()?;

            let form = NewReceipt {
                committee,
                date,
                book_number: book,
                receipt_number: number,
                trader_name: trader,
                trader_address,
                payee_name: payee,
                payee_address,
                commodity,
                quantity: Numeric::from(quantity.as_str()),
                unit,
                nature_of_receipt: nature,
                value: Numeric::from(value.as_str()),
                fees_paid: Numeric::from(fees.as_str()),
                vehicle_number: vehicle,
                invoice_number: invoice,
                collection_location: location.into(),
                checkpost_location: checkpost,
                collected_by,
                designation,
            };

            let service = ReceiptService::new(session.storage, &session.matcher);
            let receipt = service.submit(&session.principal, form)?;

            println!(
                "Receipt saved: book {} no. {} ({})",
                receipt.book_number,
                receipt.receipt_number,
                receipt.value.to_money()
            );
            println!("  ID: {}", receipt.id);
        }

        ReceiptCommands::List {
            search,
            committee,
            commodity,
        } => {
            session.require(Capability::ListReceipts)?;

            let scope = session.view_scope();
            let mut filter = ReceiptFilter::new();
            if let Some(search) = search {
                filter = filter.search(search);
            }
            if let Some(committee) = committee {
                filter = filter.committee(committee);
            }
            if let Some(commodity) = commodity {
                filter = filter.commodity(commodity);
            }

            let filtered = filter.apply(&scope.receipts, &scope.committees);
            print!(
                "{}",
                format_receipt_list(&filtered, &scope.committees, &session.settings.date_format)
            );
        }

        ReceiptCommands::Show { id } => {
            let id = id
                .parse::<ReceiptId>()
                .map_err(|_| AmcError::receipt_not_found(id.clone()))?;

            let service = ReceiptService::new(session.storage, &session.matcher);
            let receipt = service.get(&session.principal, id)?;
            let committees = session.view_snapshot().committees;
            let names = committee_names(&committees);

            print!(
                "{}",
                format_receipt_details(&receipt, receipt_committee_name(&receipt, &names))
            );
        }

        ReceiptCommands::Verify {
            committee,
            book,
            number,
        } => {
            session.require(Capability::VerifyReceipts)?;

            // Checkpost officers verify slips from any committee
            let snapshot = session.view_snapshot();
            let verification = verify_receipt(
                &snapshot.committees,
                &snapshot.receipts,
                &committee,
                &book,
                &number,
            );

            let committee_name = snapshot
                .committees
                .iter()
                .find(|c| c.is_identified_by(&committee))
                .map(|c| c.name.as_str())
                .unwrap_or(committee.as_str());

            tracing::info!(
                committee = %committee,
                book = %book,
                number = %number,
                genuine = verification.is_genuine(),
                "receipt verification"
            );
            print!("{}", format_verification(&verification, committee_name));
        }
    }

    Ok(())
}

/// The committee to enter receipts for when none is given
fn default_committee(session: &Session) -> AmcResult<String> {
    let scope = session.view_scope();
    match scope.committees.as_slice() {
        [only] => Ok(only.name.clone()),
        [] => Err(AmcError::Validation(
            "No committee is available to you; ask a director to assign one".into(),
        )),
        _ => Err(AmcError::Validation(
            "Several committees are available; pass --committee".into(),
        )),
    }
}

fn parse_date(s: &str) -> AmcResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
        AmcError::Validation(format!("Invalid date format: {}. Use YYYY-MM-DD", s))
    })
}
