//! Type-safe price representation using decimal arithmetic.
//!
//! The shop sells in a single currency, so a [`Price`] is just an exact
//! decimal amount in whole currency units (dollars, not cents). Arithmetic
//! never rounds; only [`Display`](core::fmt::Display) rounds to two places.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Mul};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An exact monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole number of currency units.
    #[must_use]
    pub fn from_units(units: u32) -> Self {
        Self(Decimal::from(units))
    }

    /// Get the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns `rate` percent of this price, unrounded.
    ///
    /// ```
    /// use candy_shop_core::Price;
    /// use rust_decimal::Decimal;
    ///
    /// let tax = Price::from_units(30).percent(Decimal::from(13));
    /// assert_eq!(tax.amount(), Decimal::new(39, 1));
    /// ```
    #[must_use]
    pub fn percent(&self, rate: Decimal) -> Self {
        Self(self.0 * rate / Decimal::ONE_HUNDRED)
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0.round_dp(2))
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Mul<u32> for Price {
    type Output = Self;

    fn mul(self, quantity: u32) -> Self::Output {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_to_cents() {
        assert_eq!(Price::new(Decimal::new(339, 1)).to_string(), "$33.90");
        assert_eq!(Price::from_units(15).to_string(), "$15.00");
        // Stored tax keeps five places; display shows cents
        assert_eq!(Price::new(Decimal::new(224_625, 5)).to_string(), "$2.25");
    }

    #[test]
    fn test_mul_and_sum() {
        let total: Price = [Price::from_units(15) * 2, Price::from_units(12) * 1]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_units(42));
    }

    #[test]
    fn test_percent_keeps_precision() {
        let tax = Price::from_units(15).percent(Decimal::new(14_975, 3));
        assert_eq!(tax.amount(), Decimal::new(224_625, 5));
    }
}
