//! Currency code and money amount types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// Error returned when parsing an invalid currency code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid currency code: {reason}")]
pub struct InvalidCurrencyCode {
    reason: &'static str,
}

/// A 3-letter ISO 4217 currency code, e.g. "EUR".
///
/// # Examples
///
/// ```
/// use fare_engine::domain::CurrencyCode;
///
/// let eur = CurrencyCode::parse("EUR").unwrap();
/// assert_eq!(eur.as_str(), "EUR");
///
/// assert!(CurrencyCode::parse("eur").is_err());
/// assert!(CurrencyCode::parse("EU").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode([u8; 3]);

impl CurrencyCode {
    /// Euro.
    pub const EUR: CurrencyCode = CurrencyCode(*b"EUR");

    /// Parse a currency code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidCurrencyCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidCurrencyCode {
                reason: "must be exactly 3 characters",
            });
        }

        for &b in bytes {
            if !b.is_ascii_uppercase() {
                return Err(InvalidCurrencyCode {
                    reason: "must be uppercase ASCII letters A-Z",
                });
            }
        }

        Ok(CurrencyCode([bytes[0], bytes[1], bytes[2]]))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Debug for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CurrencyCode({})", self.as_str())
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = InvalidCurrencyCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(value: CurrencyCode) -> Self {
        value.as_str().to_owned()
    }
}

/// A non-negative amount of money in a single currency.
///
/// Amounts are kept in minor units (cents for EUR) so sums are exact.
///
/// # Examples
///
/// ```
/// use fare_engine::domain::{CurrencyCode, Money};
///
/// let ab = Money::parse_decimal(CurrencyCode::EUR, "2.80").unwrap();
/// let bc = Money::new(CurrencyCode::EUR, 280);
///
/// let total = ab.checked_add(&bc).unwrap();
/// assert_eq!(total.minor_units(), 560);
/// assert_eq!(total.to_string(), "5.60 EUR");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    currency: CurrencyCode,
    minor_units: u64,
}

impl Money {
    /// Create an amount from minor units.
    pub fn new(currency: CurrencyCode, minor_units: u64) -> Self {
        Self {
            currency,
            minor_units,
        }
    }

    /// Zero in the given currency.
    pub fn zero(currency: CurrencyCode) -> Self {
        Self::new(currency, 0)
    }

    /// Shorthand for a euro amount given in cents.
    pub fn euro_cents(cents: u64) -> Self {
        Self::new(CurrencyCode::EUR, cents)
    }

    /// Parse a decimal amount with at most two fraction digits, e.g. "2.8"
    /// or "4.10".
    pub fn parse_decimal(currency: CurrencyCode, s: &str) -> Result<Self, DomainError> {
        let (major, minor) = match s.split_once('.') {
            Some((major, minor)) => (major, minor),
            None => (s, ""),
        };

        if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidAmount("expected non-negative decimal"));
        }
        if minor.len() > 2 || !minor.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::InvalidAmount(
                "at most two fraction digits allowed",
            ));
        }

        let major: u64 = major
            .parse()
            .map_err(|_| DomainError::InvalidAmount("amount out of range"))?;
        let minor: u64 = match minor.len() {
            0 => 0,
            1 => minor.parse::<u64>().unwrap_or(0) * 10,
            _ => minor.parse().unwrap_or(0),
        };

        major
            .checked_mul(100)
            .and_then(|m| m.checked_add(minor))
            .map(|minor_units| Self::new(currency, minor_units))
            .ok_or(DomainError::InvalidAmount("amount out of range"))
    }

    /// Returns the currency.
    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Returns the amount in minor units.
    pub fn minor_units(&self) -> u64 {
        self.minor_units
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.minor_units == 0
    }

    /// Add two amounts of the same currency.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::CurrencyMismatch`] if the currencies differ and
    /// [`DomainError::InvalidAmount`] on overflow.
    pub fn checked_add(&self, other: &Money) -> Result<Money, DomainError> {
        if self.currency != other.currency {
            return Err(DomainError::CurrencyMismatch(self.currency, other.currency));
        }
        self.minor_units
            .checked_add(other.minor_units)
            .map(|minor_units| Money::new(self.currency, minor_units))
            .ok_or(DomainError::InvalidAmount("amount out of range"))
    }
}

impl fmt::Display for Money {
    /// Formats with a two-digit minor unit, e.g. "5.60 EUR".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02} {}",
            self.minor_units / 100,
            self.minor_units % 100,
            self.currency
        )
    }
}
