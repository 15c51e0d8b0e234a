//! Type-safe price representation using decimal arithmetic.
//!
//! The shop sells in a single currency (USD), so a price is just a
//! non-negative decimal amount in dollars, capped at [`Price::MAX`].
//! Serialized as a JSON number to match what the catalog API and browser
//! clients send. Deserializing rejects negative and out-of-range amounts, so
//! a client-supplied price can never push cart arithmetic past the limits of
//! `Decimal`.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
    #[error("price cannot exceed {max} (got {0})", max = Price::MAX)]
    TooLarge(Decimal),
}

/// A USD amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest single price accepted from outside, $42,949,672.95.
    pub const MAX: Self = Self::from_cents(u32::MAX);

    /// Create a price from a decimal amount in dollars.
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if `amount` is negative or above [`Price::MAX`].
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        if amount > Self::MAX.0 {
            return Err(PriceError::TooLarge(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from whole cents.
    #[must_use]
    pub const fn from_cents(cents: u32) -> Self {
        Self(Decimal::from_parts(cents, 0, 0, false, 2))
    }

    /// The amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    ///
    /// Saturates at `Decimal::MAX` instead of overflowing.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0.round_dp(2))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

/// Totals saturate at `Decimal::MAX`.
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::float::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        assert_eq!(Price::from_cents(1999).amount(), Decimal::new(1999, 2));
        assert_eq!(Price::from_cents(0), Price::ZERO);
    }

    #[test]
    fn test_from_cents_in_const_context() {
        const SHIPPING: Price = Price::from_cents(899);
        assert_eq!(SHIPPING.amount(), Decimal::new(899, 2));
        assert_eq!(Price::MAX.amount(), Decimal::new(4_294_967_295, 2));
    }

    #[test]
    fn test_new_bounds() {
        assert_eq!(Price::new(Decimal::new(2499, 2)).unwrap(), Price::from_cents(2499));
        assert_eq!(Price::new(Decimal::ZERO).unwrap(), Price::ZERO);
        assert_eq!(Price::new(Price::MAX.amount()).unwrap(), Price::MAX);
        assert!(matches!(
            Price::new(Decimal::new(-5, 0)),
            Err(PriceError::Negative(_))
        ));
        assert!(matches!(
            Price::new(Price::MAX.amount() + Decimal::new(1, 2)),
            Err(PriceError::TooLarge(_))
        ));
    }

    #[test]
    fn test_times_and_sum() {
        let total: Price = [Price::from_cents(1250).times(2), Price::from_cents(499)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(2999));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Price(Decimal::MAX);
        assert_eq!(huge.times(10).amount(), Decimal::MAX);
        assert_eq!((huge + Price::MAX).amount(), Decimal::MAX);

        let lines = [Price::MAX.times(u32::MAX), Price::MAX.times(u32::MAX)];
        let total: Price = lines.into_iter().sum();
        assert!(total > Price::MAX);
    }

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(2500).display(), "$25.00");
        assert_eq!(Price::from_cents(899).to_string(), "$8.99");
    }

    #[test]
    fn test_json_number_roundtrip() {
        let price: Price = serde_json::from_str("24.99").unwrap();
        assert_eq!(price, Price::from_cents(2499));
        assert_eq!(serde_json::to_string(&price).unwrap(), "24.99");

        let whole: Price = serde_json::from_str("18").unwrap();
        assert_eq!(whole, Price::from_cents(1800));
    }

    #[test]
    fn test_json_rejects_negative_and_huge() {
        let negative = serde_json::from_str::<Price>("-5").unwrap_err();
        assert!(negative.to_string().contains("negative"));

        let huge = serde_json::from_str::<Price>("1e28").unwrap_err();
        assert!(huge.to_string().contains("exceed"));
    }
}
