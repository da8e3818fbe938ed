//! Line-item quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A cart line quantity, always at least one.
///
/// Out-of-range input is clamped rather than rejected: a decrement below one
/// stays at one, and a stored `0` or negative value reads back as one.
///
/// ```
/// use banda_core::Quantity;
///
/// assert_eq!(Quantity::clamped(-4).get(), 1);
/// assert_eq!(Quantity::new(3).offset(-1).get(), 2);
/// assert_eq!(Quantity::ONE.offset(-10), Quantity::ONE);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "serde_json::Number", into = "u32")]
pub struct Quantity(u32);

impl Quantity {
    /// The smallest valid quantity.
    pub const ONE: Self = Self(1);

    /// Create a quantity, raising zero to one.
    #[must_use]
    pub const fn new(qty: u32) -> Self {
        if qty == 0 { Self::ONE } else { Self(qty) }
    }

    /// Create a quantity from any integer, clamping into `1..=u32::MAX`.
    #[must_use]
    pub fn clamped(qty: i64) -> Self {
        u32::try_from(qty.max(1)).map_or(Self(u32::MAX), Self)
    }

    /// Parse free-form user input (a quantity field).
    ///
    /// Non-numeric input yields one; fractional input is truncated.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        let trimmed = raw.trim();
        trimmed.parse::<i64>().map_or_else(
            |_| {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|f| f.is_finite())
                    .map_or(Self::ONE, truncate_float)
            },
            Self::clamped,
        )
    }

    /// Returns the quantity as a plain integer.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Apply a signed step, never going below one.
    #[must_use]
    pub fn offset(self, delta: i64) -> Self {
        Self::clamped(i64::from(self.0).saturating_add(delta))
    }

    /// Sum two quantities, saturating at `u32::MAX`.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Quantity> for u32 {
    fn from(qty: Quantity) -> Self {
        qty.0
    }
}

impl From<serde_json::Number> for Quantity {
    fn from(number: serde_json::Number) -> Self {
        if let Some(signed) = number.as_i64() {
            Self::clamped(signed)
        } else if number.as_u64().is_some() {
            Self(u32::MAX)
        } else {
            number
                .as_f64()
                .filter(|f| f.is_finite())
                .map_or(Self::ONE, truncate_float)
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_float(value: f64) -> Quantity {
    // `as` saturates on overflow, which is the clamping we want.
    Quantity::clamped(value.trunc() as i64)
}
