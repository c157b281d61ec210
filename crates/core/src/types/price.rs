//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product price.
///
/// Wraps a [`Decimal`] amount so price math never goes through binary
/// floating point. Serializes as a plain JSON number because that is what
/// the catalog feed emits and what the persisted cart mirrors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Total for a cart line: `price * quantity`.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }

    /// Price after applying a percentage discount, floored to a whole unit.
    ///
    /// Percentages above 100 are clamped; the result is never negative.
    #[must_use]
    pub fn discounted(&self, percent: u32) -> Self {
        let remaining = Decimal::from(100 - percent.min(100));
        Self((self.0 * remaining / Decimal::from(100_u32)).floor())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "₹{:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let price = Price::new(Decimal::new(9999, 2)); // 99.99
        assert_eq!(price.line_total(3), Decimal::new(29997, 2));
    }

    #[test]
    fn test_line_total_zero_quantity() {
        let price = Price::new(Decimal::from(100));
        assert_eq!(price.line_total(0), Decimal::ZERO);
    }

    #[test]
    fn test_discounted_floors_result() {
        // 549 with 23% off = 422.73, floored to 422
        let price = Price::new(Decimal::from(549));
        assert_eq!(price.discounted(23), Price::new(Decimal::from(422)));
    }

    #[test]
    fn test_discounted_clamps_percent() {
        let price = Price::new(Decimal::from(100));
        assert_eq!(price.discounted(150), Price::new(Decimal::ZERO));
    }

    #[test]
    fn test_serde_as_json_number() {
        let price = Price::new(Decimal::new(1295, 1)); // 129.5
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "129.5");

        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }

    #[test]
    fn test_display_two_decimals() {
        let price = Price::new(Decimal::new(125, 1)); // 12.5
        assert_eq!(price.to_string(), "₹12.50");
    }
}
