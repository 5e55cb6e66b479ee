//! Receipt model
//!
//! A single trade transaction recorded by a committee: who traded what, how
//! much, its value and the market fee collected on it.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CommitteeId, ReceiptId, UserId};
use super::numeric::Numeric;

/// Commodities offered on the entry form
pub const COMMODITIES: [&str; 15] = [
    "Rice", "Wheat", "Jowar", "Bajra", "Maize", "Tur", "Gram", "Moong", "Urad", "Masur", "Cotton",
    "Sugarcane", "Onion", "Potato", "Tomato",
];

/// Largest quantity, value or fee a receipt may carry (₹1,00,000 crore)
pub const MAX_RECEIPT_FIGURE: f64 = 1e12;

/// Whether `commodity` is one of the entry-form commodities (case-insensitive)
pub fn is_known_commodity(commodity: &str) -> bool {
    COMMODITIES
        .iter()
        .any(|known| known.eq_ignore_ascii_case(commodity.trim()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ReceiptStatus {
    #[default]
    Active,
    Cancelled,
}

impl fmt::Display for ReceiptStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Where the fee was collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CollectionLocation {
    #[default]
    Office,
    Checkpost,
    Other,
}

impl fmt::Display for CollectionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Office => write!(f, "Office"),
            Self::Checkpost => write!(f, "Checkpost"),
            Self::Other => write!(f, "Other"),
        }
    }
}

/// A trade receipt as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,

    pub date: NaiveDate,

    /// The committee that issued the receipt. `None` marks a malformed row,
    /// which is never visible to committee-scoped principals.
    #[serde(default)]
    pub committee_id: Option<CommitteeId>,

    #[serde(default)]
    pub book_number: String,

    #[serde(default)]
    pub receipt_number: String,

    #[serde(default)]
    pub trader_name: String,

    #[serde(default)]
    pub trader_address: String,

    #[serde(default)]
    pub payee_name: String,

    #[serde(default)]
    pub payee_address: String,

    #[serde(default)]
    pub commodity: String,

    #[serde(default)]
    pub quantity: Numeric,

    #[serde(default = "default_unit")]
    pub unit: String,

    #[serde(default)]
    pub nature_of_receipt: String,

    /// Trade value in rupees
    #[serde(default)]
    pub value: Numeric,

    /// Market fee collected, in rupees
    #[serde(default)]
    pub fees_paid: Numeric,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    #[serde(default)]
    pub collection_location: CollectionLocation,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkpost_location: Option<String>,

    #[serde(default)]
    pub collected_by: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,

    #[serde(default)]
    pub status: ReceiptStatus,

    /// The user who entered the receipt
    #[serde(default)]
    pub created_by: Option<UserId>,

    pub created_at: DateTime<Utc>,
}

fn default_unit() -> String {
    "Quintals".to_string()
}

impl Receipt {
    /// Create an active receipt for a committee with empty details
    pub fn new(committee_id: CommitteeId, date: NaiveDate) -> Self {
        Self {
            id: ReceiptId::new(),
            date,
            committee_id: Some(committee_id),
            book_number: String::new(),
            receipt_number: String::new(),
            trader_name: String::new(),
            trader_address: String::new(),
            payee_name: String::new(),
            payee_address: String::new(),
            commodity: String::new(),
            quantity: Numeric::Missing,
            unit: default_unit(),
            nature_of_receipt: String::new(),
            value: Numeric::Missing,
            fees_paid: Numeric::Missing,
            vehicle_number: None,
            invoice_number: None,
            collection_location: CollectionLocation::default(),
            checkpost_location: None,
            collected_by: String::new(),
            designation: None,
            status: ReceiptStatus::Active,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    /// Key identifying a physical receipt slip: committee, book, number
    pub fn slip_matches(&self, committee_id: CommitteeId, book: &str, number: &str) -> bool {
        self.committee_id == Some(committee_id)
            && self.book_number.trim().eq_ignore_ascii_case(book.trim())
            && self.receipt_number.trim().eq_ignore_ascii_case(number.trim())
    }

    /// Validate a receipt before submission
    pub fn validate(&self) -> Result<(), ReceiptValidationError> {
        if self.committee_id.is_none() {
            return Err(ReceiptValidationError::MissingField("committee"));
        }
        for (field, value) in [
            ("trader name", &self.trader_name),
            ("book number", &self.book_number),
            ("receipt number", &self.receipt_number),
            ("commodity", &self.commodity),
        ] {
            if value.trim().is_empty() {
                return Err(ReceiptValidationError::MissingField(field));
            }
        }
        for (field, value) in [
            ("quantity", &self.quantity),
            ("value", &self.value),
            ("fees paid", &self.fees_paid),
        ] {
            match value.parse() {
                None => {
                    return Err(ReceiptValidationError::InvalidNumber {
                        field,
                        value: value.to_string(),
                    })
                }
                Some(n) if n < 0.0 => return Err(ReceiptValidationError::Negative(field)),
                Some(n) if n > MAX_RECEIPT_FIGURE => {
                    return Err(ReceiptValidationError::TooLarge(field))
                }
                Some(_) => {}
            }
        }
        if self.collection_location == CollectionLocation::Checkpost
            && self
                .checkpost_location
                .as_deref()
                .map_or(true, |s| s.trim().is_empty())
        {
            return Err(ReceiptValidationError::MissingField("checkpost location"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptValidationError {
    MissingField(&'static str),
    InvalidNumber { field: &'static str, value: String },
    Negative(&'static str),
    TooLarge(&'static str),
}

impl fmt::Display for ReceiptValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "Receipt {} is required", field),
            Self::InvalidNumber { field, value } => {
                write!(f, "Receipt {} must be a number, got '{}'", field, value)
            }
            Self::Negative(field) => write!(f, "Receipt {} cannot be negative", field),
            Self::TooLarge(field) => write!(
                f,
                "Receipt {} exceeds the limit of {}",
                field, MAX_RECEIPT_FIGURE
            ),
        }
    }
}

impl std::error::Error for ReceiptValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_receipt() -> Receipt {
        let mut receipt = Receipt::new(
            CommitteeId::new(),
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
        );
        receipt.trader_name = "Sri Lakshmi Traders".into();
        receipt.book_number = "B-12".into();
        receipt.receipt_number = "0041".into();
        receipt.commodity = "Rice".into();
        receipt.quantity = Numeric::from("25");
        receipt.value = Numeric::from(62500.0);
        receipt.fees_paid = Numeric::from("625");
        receipt
    }

    #[test]
    fn test_complete_receipt_is_valid() {
        assert!(complete_receipt().validate().is_ok());
    }

    #[test]
    fn test_missing_trader_rejected() {
        let mut receipt = complete_receipt();
        receipt.trader_name = "  ".into();
        assert_eq!(
            receipt.validate(),
            Err(ReceiptValidationError::MissingField("trader name"))
        );
    }

    #[test]
    fn test_non_numeric_value_rejected() {
        let mut receipt = complete_receipt();
        receipt.value = Numeric::from("lots");
        assert!(matches!(
            receipt.validate(),
            Err(ReceiptValidationError::InvalidNumber { field: "value", .. })
        ));
    }

    #[test]
    fn test_out_of_range_figures_rejected() {
        let mut receipt = complete_receipt();
        receipt.value = Numeric::from("1e17");
        assert_eq!(
            receipt.validate(),
            Err(ReceiptValidationError::TooLarge("value"))
        );

        let mut receipt = complete_receipt();
        receipt.fees_paid = Numeric::Number(1e13);
        assert_eq!(
            receipt.validate(),
            Err(ReceiptValidationError::TooLarge("fees paid"))
        );

        let mut receipt = complete_receipt();
        receipt.value = Numeric::Number(MAX_RECEIPT_FIGURE);
        assert!(receipt.validate().is_ok());
    }

    #[test]
    fn test_checkpost_requires_location() {
        let mut receipt = complete_receipt();
        receipt.collection_location = CollectionLocation::Checkpost;
        assert!(receipt.validate().is_err());
        receipt.checkpost_location = Some("Payakaraopeta".into());
        assert!(receipt.validate().is_ok());
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let json = r#"{
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "date": "2025-02-01",
            "value": "abc",
            "created_at": "2025-02-01T10:00:00Z"
        }"#;
        let receipt: Receipt = serde_json::from_str(json).unwrap();
        assert!(receipt.committee_id.is_none());
        assert_eq!(receipt.value.or_zero(), 0.0);
        assert_eq!(receipt.unit, "Quintals");
        assert_eq!(receipt.status, ReceiptStatus::Active);
    }

    #[test]
    fn test_known_commodity() {
        assert!(is_known_commodity("rice"));
        assert!(!is_known_commodity("Saffron"));
    }
}
