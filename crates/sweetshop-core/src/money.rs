//! # Money Module
//!
//! Provides the `Money` type for handling item prices safely.
//!
//! ## Integer Cents Internally, Decimal on the Wire
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON body          Money (in memory / SQLite)         JSON response    │
//! │                                                                         │
//! │  "price": 2.5  ──►  Money(250)  ──► price_cents = 250  ──► "price": 2.5 │
//! │                                                                         │
//! │  Rounding to whole cents happens exactly once, at the boundary.         │
//! │  Filters, comparisons and storage only ever see integers.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sweetshop_core::money::Money;
//!
//! let price = Money::from_cents(250);
//! assert_eq!(price.to_string(), "$2.50");
//!
//! let parsed = Money::from_decimal(1.5).unwrap();
//! assert_eq!(parsed.cents(), 150);
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// Serializes as a JSON number in major units (`250` cents → `2.5`), which is
/// the shape the storefront and admin clients send and expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount in major units (e.g. `2.50`) to Money.
    ///
    /// Rounds half away from zero to the nearest cent. Rejects NaN, infinities
    /// and values that do not fit in `i64` cents.
    ///
    /// ## Example
    /// ```rust
    /// use sweetshop_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(4.0).unwrap().cents(), 400);
    /// assert_eq!(Money::from_decimal(0.125).unwrap().cents(), 13);
    /// assert!(Money::from_decimal(f64::NAN).is_err());
    /// ```
    pub fn from_decimal(amount: f64) -> Result<Self, ValidationError> {
        let cents = (amount * 100.0).round();
        if !cents.is_finite() || cents.abs() >= i64::MAX as f64 {
            return Err(ValidationError::InvalidFormat {
                field: "price".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }
        Ok(Money(cents as i64))
    }

    /// Returns the value as a decimal in major units (for the wire only).
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Human-readable format, for logs and the seed binary.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_from_decimal_rounds_to_cents() {
        assert_eq!(Money::from_decimal(2.5).unwrap().cents(), 250);
        assert_eq!(Money::from_decimal(1.005).unwrap().cents(), 100);
        assert_eq!(Money::from_decimal(0.0).unwrap().cents(), 0);
        assert_eq!(Money::from_decimal(-3.0).unwrap().cents(), -300);
    }

    #[test]
    fn test_from_decimal_rejects_non_finite() {
        assert!(Money::from_decimal(f64::INFINITY).is_err());
        assert!(Money::from_decimal(f64::NEG_INFINITY).is_err());
        assert!(Money::from_decimal(f64::NAN).is_err());
        assert!(Money::from_decimal(1e300).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::zero()), "$0.00");
    }

    #[test]
    fn test_json_shape_is_decimal_number() {
        let json = serde_json::to_string(&Money::from_cents(150)).unwrap();
        assert_eq!(json, "1.5");

        let parsed: Money = serde_json::from_str("4.00").unwrap();
        assert_eq!(parsed, Money::from_cents(400));

        let parsed: Money = serde_json::from_str("2").unwrap();
        assert_eq!(parsed.cents(), 200);
    }

    #[test]
    fn test_ordering_follows_cents() {
        assert!(Money::from_cents(150) < Money::from_cents(250));
        assert!(Money::from_cents(-1).is_negative());
    }
}
