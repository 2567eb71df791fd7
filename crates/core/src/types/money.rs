//! Monetary amounts tagged with a currency code.
//!
//! Amounts use decimal arithmetic and are stored in the currency's standard
//! unit (e.g. dollars, not cents). On the wire an amount is a JSON number, the
//! shape storefront clients already consume.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Error returned when a string is not an ISO 4217 style code.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid currency code: {0:?}")]
pub struct CurrencyCodeError(pub String);

/// Three-letter uppercase currency code (e.g. `USD`, `EUR`, `BGN`).
///
/// Codes come from the currency reference table, so the set is open; only the
/// shape is validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parse a currency code.
    ///
    /// # Errors
    ///
    /// Returns [`CurrencyCodeError`] unless the input is exactly three ASCII
    /// uppercase letters.
    pub fn parse(s: &str) -> Result<Self, CurrencyCodeError> {
        if s.len() == 3 && s.bytes().all(|b| b.is_ascii_uppercase()) {
            Ok(Self(s.to_owned()))
        } else {
            Err(CurrencyCodeError(s.to_owned()))
        }
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = CurrencyCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

/// An amount in a specific currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Amount in the currency's standard unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    /// Currency the amount is expressed in.
    pub currency: CurrencyCode,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub const fn new(amount: Decimal, currency: CurrencyCode) -> Self {
        Self { amount, currency }
    }
}
