//! Stored numeric fields
//!
//! Receipts arrive from the backend with quantity, value and fees in
//! whatever form the entry form submitted them: a JSON number, a numeric
//! string such as `"1,250.50"`, or nothing at all. `Numeric` keeps that
//! stored form and parses it only when a number is needed. Any other JSON
//! value is kept as `Invalid` and never parses.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// A numeric field in its stored representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
    #[default]
    Missing,
    Invalid(serde_json::Value),
}

impl Numeric {
    /// Parse the stored value
    ///
    /// Text is trimmed and may carry a leading `₹` and thousands
    /// separators. Returns `None` for missing, empty, or unparseable values.
    pub fn parse(&self) -> Option<f64> {
        match self {
            Self::Number(n) if n.is_finite() => Some(*n),
            Self::Number(_) | Self::Missing | Self::Invalid(_) => None,
            Self::Text(s) => {
                let cleaned: String = s
                    .trim()
                    .trim_start_matches('₹')
                    .chars()
                    .filter(|c| *c != ',' && !c.is_whitespace())
                    .collect();
                cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
            }
        }
    }

    /// The parsed value, with anything unparseable counting as zero
    pub fn or_zero(&self) -> f64 {
        self.parse().unwrap_or(0.0)
    }

    /// The parsed value as a rupee amount (zero when unparseable)
    pub fn to_money(&self) -> Money {
        Money::from_rupees_f64(self.or_zero())
    }

    pub fn is_valid(&self) -> bool {
        self.parse().is_some()
    }
}

impl From<f64> for Numeric {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Numeric {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
            Self::Missing => Ok(()),
            Self::Invalid(v) => write!(f, "{}", v),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number_and_text() {
        assert_eq!(Numeric::Number(100.0).parse(), Some(100.0));
        assert_eq!(Numeric::from("250.5").parse(), Some(250.5));
        assert_eq!(Numeric::from(" ₹1,25,000 ").parse(), Some(125000.0));
    }

    #[test]
    fn test_unparseable_counts_as_zero() {
        assert_eq!(Numeric::from("abc").parse(), None);
        assert_eq!(Numeric::from("abc").or_zero(), 0.0);
        assert_eq!(Numeric::from("").or_zero(), 0.0);
        assert_eq!(Numeric::Missing.or_zero(), 0.0);
        assert_eq!(Numeric::Number(f64::INFINITY).or_zero(), 0.0);
    }

    #[test]
    fn test_deserialize_any_form() {
        let values: Vec<Numeric> = serde_json::from_str(r#"[100, 12.5, "300", null]"#).unwrap();
        assert_eq!(values[0], Numeric::Number(100.0));
        assert_eq!(values[1], Numeric::Number(12.5));
        assert_eq!(values[2], Numeric::Text("300".into()));
        assert_eq!(values[3], Numeric::Missing);
    }

    #[test]
    fn test_wrong_json_type_is_kept_but_never_parses() {
        let values: Vec<Numeric> = serde_json::from_str(r#"[true, {"amount": 5}, [1]]"#).unwrap();
        assert_eq!(values[0], Numeric::Invalid(serde_json::Value::Bool(true)));
        assert!(values.iter().all(|v| v.parse().is_none()));
        assert_eq!(values[0].to_money(), Money::zero());
        assert_eq!(values[0].to_string(), "true");
        assert_eq!(serde_json::to_string(&values[1]).unwrap(), r#"{"amount":5}"#);
    }

    #[test]
    fn test_to_money() {
        assert_eq!(Numeric::from("99.99").to_money(), Money::from_paise(9999));
        assert_eq!(Numeric::from("n/a").to_money(), Money::zero());
    }
}
