//! Strongly-typed value objects used by domain entities.
//!
//! Domain structs should carry these wrappers instead of raw primitives so that
//! identifiers, text values and monetary constraints are enforced at the
//! boundary.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use thiserror::Error;

/// Errors produced when attempting to construct constrained domain types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// A numeric value required to be positive was zero/negative or invalid.
    #[error("{0} must be greater than zero")]
    NonPositiveNumber(&'static str),
    /// A numeric value required to be non-negative was negative.
    #[error("{0} must be zero or greater")]
    NegativeNumber(&'static str),
    /// A string was empty or whitespace-only after trimming.
    #[error("{0} cannot be empty")]
    EmptyString(&'static str),
    /// The category code is not part of the registry.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    /// An itemized receipt ended up without any line items.
    #[error("receipt must contain at least one item")]
    MissingItems,
}

fn trim_and_require_non_empty<S: Into<String>>(
    value: S,
    field: &'static str,
) -> Result<String, TypeConstraintError> {
    let trimmed = value.into().trim().to_string();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyString(field))
    } else {
        Ok(trimmed)
    }
}

macro_rules! non_empty_string_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Constructs a trimmed, non-empty value.
            pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
                trim_and_require_non_empty(value, $field).map(Self)
            }

            /// Borrow the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }

        impl PartialEq<$name> for &str {
            fn eq(&self, other: &$name) -> bool {
                *self == other.as_str()
            }
        }
    };
}

macro_rules! non_negative_f64_newtype {
    ($name:ident, $doc:expr, $field:expr) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, PartialOrd)]
        #[serde(try_from = "f64", into = "f64")]
        pub struct $name(f64);

        impl $name {
            /// Constructs a finite numeric value that is zero or greater.
            pub fn new(value: f64) -> Result<Self, TypeConstraintError> {
                if value.is_finite() && value >= 0.0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NegativeNumber($field))
                }
            }

            /// Constructs a strictly positive, finite value.
            pub fn positive(value: f64) -> Result<Self, TypeConstraintError> {
                if value.is_finite() && value > 0.0 {
                    Ok(Self(value))
                } else {
                    Err(TypeConstraintError::NonPositiveNumber($field))
                }
            }

            /// Returns the raw `f64` value.
            pub const fn get(self) -> f64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<f64> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: f64) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for f64 {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl PartialEq<f64> for $name {
            fn eq(&self, other: &f64) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<$name> for f64 {
            fn eq(&self, other: &$name) -> bool {
                *self == other.0
            }
        }
    };
}

non_empty_string_newtype!(ReceiptId, "Opaque receipt identifier.", "receipt id");
non_empty_string_newtype!(UserId, "Identifier of the receipt owner.", "user id");
non_empty_string_newtype!(
    AppId,
    "Application/tenant identifier scoping stored receipts.",
    "app id"
);
non_empty_string_newtype!(
    ReceiptTitle,
    "Receipt title enforcing non-empty values.",
    "title"
);
non_empty_string_newtype!(
    ItemName,
    "Line item name enforcing non-empty values.",
    "item name"
);
non_empty_string_newtype!(
    CategoryCode,
    "Normalized category key enforcing non-empty values.",
    "category"
);

non_negative_f64_newtype!(
    Money,
    "Non-negative monetary value in standard currency units.",
    "amount"
);

/// Sentinel owner of data that only lives in the local mock store.
pub const MOCK_USER_ID: &str = "mock-user";

impl UserId {
    /// The [`MOCK_USER_ID`] sentinel.
    pub fn mock() -> Self {
        Self(MOCK_USER_ID.to_string())
    }
}

impl AppId {
    /// Tenant used for local-only data.
    pub fn local() -> Self {
        Self("local".to_string())
    }
}

/// Free-form receipt date, expected as `YYYY-MM-DD`.
///
/// Unparsable values are kept verbatim and order as the earliest possible
/// date.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct ReceiptDate(String);

impl ReceiptDate {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into().trim().to_string())
    }

    /// Today's local date in ISO form.
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive().format("%Y-%m-%d").to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Milliseconds since the Unix epoch, `i64::MIN` when the value does not
    /// parse.
    pub fn timestamp(&self) -> i64 {
        if let Ok(date) = NaiveDate::parse_from_str(&self.0, "%Y-%m-%d") {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| dt.and_utc().timestamp_millis())
                .unwrap_or(i64::MIN);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.0) {
            return dt.timestamp_millis();
        }
        i64::MIN
    }
}

impl Display for ReceiptDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ReceiptDate {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for ReceiptDate {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Cleans user-typed money input.
///
/// Commas become decimal points and every other character that is not a digit
/// or `.` is dropped before parsing. Returns `None` for empty or unparsable
/// input.
pub fn parse_amount(input: &str) -> Option<f64> {
    let cleaned: String = input
        .replace(',', ".")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Rounds to two decimal places.
pub fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_non_empty_strings() {
        let value = ReceiptTitle::new("  weekly groceries  ").unwrap();
        assert_eq!(value.as_str(), "weekly groceries");
    }

    #[test]
    fn rejects_blank_category_code() {
        let err = CategoryCode::new("   ").unwrap_err();
        assert_eq!(err, TypeConstraintError::EmptyString("category"));
    }

    #[test]
    fn money_allows_zero_but_positive_does_not() {
        assert_eq!(Money::new(0.0).unwrap().get(), 0.0);
        assert_eq!(
            Money::positive(0.0).unwrap_err(),
            TypeConstraintError::NonPositiveNumber("amount")
        );
    }

    #[test]
    fn money_rejects_negative_numbers() {
        assert_eq!(
            Money::new(-0.01).unwrap_err(),
            TypeConstraintError::NegativeNumber("amount")
        );
    }

    #[test]
    fn parse_amount_accepts_comma_decimal_separator() {
        assert_eq!(parse_amount("32,50"), Some(32.5));
        assert_eq!(parse_amount(" 15.00 TL"), Some(15.0));
    }

    #[test]
    fn parse_amount_rejects_garbage() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("1.2.3"), None);
    }

    #[test]
    fn round_to_cents_handles_float_noise() {
        assert_eq!(round_to_cents(0.1 + 0.2), 0.3);
        assert_eq!(round_to_cents(10.004), 10.0);
    }

    #[test]
    fn unparsable_dates_sort_as_earliest() {
        let bad = ReceiptDate::new("yesterday");
        let good = ReceiptDate::new("1970-01-01");
        assert_eq!(bad.timestamp(), i64::MIN);
        assert!(good.timestamp() > bad.timestamp());
    }

    #[test]
    fn rfc3339_dates_are_understood() {
        let date = ReceiptDate::new("2025-11-05T10:00:00Z");
        let day = ReceiptDate::new("2025-11-05");
        assert!(date.timestamp() > day.timestamp());
    }

    #[test]
    fn serde_rejects_empty_identifiers() {
        let parsed: Result<ReceiptId, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
    }
}
