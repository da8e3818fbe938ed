//! Ruble prices using decimal arithmetic.
//!
//! Prices are stored in whole currency units (rubles, not kopecks) and are
//! persisted as plain JSON numbers so that records written by other scripts on
//! the same page stay readable.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Quantity;

/// Group separator and currency spacing used by the ru-RU number format.
const NBSP: char = '\u{a0}';

/// Ruble sign appended to formatted amounts.
const RUBLE_SIGN: char = '₽';

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The input is not a number.
    #[error("invalid price: {0}")]
    Invalid(String),
}

/// A non-negative price in rubles.
///
/// ## Examples
///
/// ```
/// use banda_core::{Price, Quantity};
///
/// let price = Price::from_attribute(Some("1500"));
/// assert_eq!(price.format_rub(), "1\u{a0}500\u{a0}₽");
/// assert_eq!(price.times(Quantity::new(2)).format_rub(), "3\u{a0}000\u{a0}₽");
///
/// // Unparseable catalog attributes fall back to zero.
/// assert_eq!(Price::from_attribute(Some("n/a")), Price::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A zero price.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of rubles.
    #[must_use]
    pub fn from_rubles(rubles: u64) -> Self {
        Self(Decimal::from(rubles))
    }

    /// Parse a `data-price` attribute value.
    ///
    /// Missing, non-numeric and negative values all become [`Price::ZERO`],
    /// so a badly annotated catalog card still produces a cart line.
    #[must_use]
    pub fn from_attribute(raw: Option<&str>) -> Self {
        raw.and_then(|value| value.parse::<Self>().ok())
            .unwrap_or(Self::ZERO)
    }

    /// Returns the underlying amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `true` if the price is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Price of `qty` units at this unit price.
    #[must_use]
    pub fn times(self, qty: Quantity) -> Self {
        Self(self.0.saturating_mul(Decimal::from(qty.get())))
    }

    /// Format as rubles the way the ru-RU locale does, with no fraction digits.
    ///
    /// `2000` becomes `"2 000 ₽"` (both gaps are no-break spaces). Fractions
    /// round half away from zero.
    #[must_use]
    pub fn format_rub(&self) -> String {
        let whole = self
            .0
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .trunc()
            .to_string();

        let digits: Vec<char> = whole.chars().collect();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 2);
        for (i, digit) in digits.iter().enumerate() {
            let remaining = digits.len() - i;
            if i > 0 && remaining % 3 == 0 {
                out.push(NBSP);
            }
            out.push(*digit);
        }
        out.push(NBSP);
        out.push(RUBLE_SIGN);
        out
    }
}

impl FromStr for Price {
    type Err = PriceError;

    /// Parses decimal and scientific notation, ignoring surrounding whitespace.
    /// An empty string is zero.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::ZERO);
        }
        let amount = trimmed
            .parse::<Decimal>()
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map_err(|_| PriceError::Invalid(trimmed.to_owned()))?;
        Self::new(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_rub())
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0.fract().is_zero()
            && let Some(whole) = self.0.to_i64()
        {
            return serializer.serialize_i64(whole);
        }
        let float = self
            .0
            .to_f64()
            .ok_or_else(|| serde::ser::Error::custom("price out of range"))?;
        serializer.serialize_f64(float)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = serde_json::Number::deserialize(deserializer)?;
        let amount = if let Some(signed) = number.as_i64() {
            Decimal::from(signed)
        } else if let Some(unsigned) = number.as_u64() {
            Decimal::from(unsigned)
        } else {
            number
                .as_f64()
                .and_then(|float| Decimal::try_from(float).ok())
                .ok_or_else(|| D::Error::custom(format!("invalid price: {number}")))?
        };
        Self::new(amount).map_err(D::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_format_groups_thousands() {
        assert_eq!(Price::from_rubles(0).format_rub(), "0\u{a0}₽");
        assert_eq!(Price::from_rubles(999).format_rub(), "999\u{a0}₽");
        assert_eq!(Price::from_rubles(2000).format_rub(), "2\u{a0}000\u{a0}₽");
        assert_eq!(
            Price::from_rubles(1_234_567).format_rub(),
            "1\u{a0}234\u{a0}567\u{a0}₽"
        );
    }

    #[test]
    fn test_format_rounds_fraction_away_from_zero() {
        let price: Price = "1999.5".parse().unwrap();
        assert_eq!(price.format_rub(), "2\u{a0}000\u{a0}₽");
        let price: Price = "1999.49".parse().unwrap();
        assert_eq!(price.format_rub(), "1\u{a0}999\u{a0}₽");
    }

    #[test]
    fn test_parse_attribute_values() {
        assert_eq!(Price::from_attribute(Some(" 2000 ")), Price::from_rubles(2000));
        assert_eq!(Price::from_attribute(Some("1e3")), Price::from_rubles(1000));
        assert_eq!(Price::from_attribute(Some("")), Price::ZERO);
        assert_eq!(Price::from_attribute(Some("abc")), Price::ZERO);
        assert_eq!(Price::from_attribute(Some("-5")), Price::ZERO);
        assert_eq!(Price::from_attribute(None), Price::ZERO);
    }

    #[test]
    fn test_new_rejects_negative() {
        assert!(matches!(
            Price::new(Decimal::from(-1)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [
            Price::from_rubles(1000).times(Quantity::new(2)),
            Price::from_rubles(1500).times(Quantity::new(1)),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, Price::from_rubles(3500));
    }

    #[test]
    fn test_serializes_as_json_number() {
        assert_eq!(
            serde_json::to_string(&Price::from_rubles(2000)).unwrap(),
            "2000"
        );
        let fractional: Price = "19.5".parse().unwrap();
        assert_eq!(serde_json::to_string(&fractional).unwrap(), "19.5");
    }

    #[test]
    fn test_deserializes_numbers() {
        let whole: Price = serde_json::from_str("2000").unwrap();
        assert_eq!(whole, Price::from_rubles(2000));
        let fractional: Price = serde_json::from_str("19.5").unwrap();
        assert_eq!(fractional.amount(), Decimal::new(195, 1));
        assert!(serde_json::from_str::<Price>("-10").is_err());
        assert!(serde_json::from_str::<Price>("\"2000\"").is_err());
    }
}
