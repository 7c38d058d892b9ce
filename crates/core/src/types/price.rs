//! Type-safe unit price representation using decimal arithmetic.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    /// The input is not a decimal number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative unit price in the store currency.
///
/// Serialized as a decimal string (`"12.50"`) so amounts round-trip exactly.
/// Deserialization also accepts plain JSON numbers, which is how older
/// persisted carts stored prices.
///
/// ```
/// use rust_decimal::Decimal;
/// use storecart_core::Price;
///
/// let price: Price = "12.5".parse().unwrap();
/// assert_eq!(price.to_string(), "$12.50");
/// assert!(Price::new(Decimal::NEGATIVE_ONE).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "PriceRepr", into = "String")]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount.normalize()))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units, or `None` if it exceeds the decimal range.
    #[must_use]
    pub fn checked_times(&self, quantity: u32) -> Option<Decimal> {
        self.0.checked_mul(Decimal::from(quantity))
    }

    /// Format an arbitrary amount the way prices are displayed (`$25.00`).
    #[must_use]
    pub fn format_amount(amount: Decimal) -> String {
        format!("${:.2}", amount.round_dp(2))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::format_amount(self.0))
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('$');
        let amount = Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map_err(|_| PriceError::Invalid(s.to_owned()))?;
        Self::new(amount)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Price> for String {
    fn from(price: Price) -> Self {
        price.0.to_string()
    }
}

/// Accepted wire forms of a price.
#[derive(Deserialize)]
#[serde(untagged)]
enum PriceRepr {
    Text(String),
    Number(serde_json::Number),
}

impl TryFrom<PriceRepr> for Price {
    type Error = PriceError;

    fn try_from(repr: PriceRepr) -> Result<Self, Self::Error> {
        match repr {
            PriceRepr::Text(s) => s.parse(),
            PriceRepr::Number(n) => n.to_string().parse(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::new(-1, 2)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_parse_strips_currency_symbol() {
        let price: Price = "$19.99".parse().unwrap();
        assert_eq!(price.amount(), Decimal::new(1999, 2));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!("abc".parse::<Price>(), Err(PriceError::Invalid(_))));
    }

    #[test]
    fn test_display_two_decimals() {
        let price: Price = "10".parse().unwrap();
        assert_eq!(price.to_string(), "$10.00");
        assert_eq!(Price::format_amount(Decimal::new(25, 0)), "$25.00");
    }

    #[test]
    fn test_times() {
        let price: Price = "2.50".parse().unwrap();
        assert_eq!(price.checked_times(3), Some(Decimal::new(75, 1)));
    }

    #[test]
    fn test_times_out_of_range() {
        let price: Price = "40000000000000000000000000000".parse().unwrap();
        assert_eq!(price.checked_times(1), Some(price.amount()));
        assert_eq!(price.checked_times(2), None);
    }

    #[test]
    fn test_serializes_as_string() {
        let price: Price = "12.5".parse().unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), r#""12.5""#);
    }

    #[test]
    fn test_deserializes_legacy_number() {
        let price: Price = serde_json::from_str("10.25").unwrap();
        assert_eq!(price.amount(), Decimal::new(1025, 2));
        let whole: Price = serde_json::from_str("5").unwrap();
        assert_eq!(whole.amount(), Decimal::new(5, 0));
    }

    #[test]
    fn test_deserialize_rejects_negative() {
        assert!(serde_json::from_str::<Price>("-3").is_err());
        assert!(serde_json::from_str::<Price>(r#""-3.00""#).is_err());
    }
}
