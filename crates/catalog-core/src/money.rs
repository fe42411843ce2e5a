//! # Money Module
//!
//! Provides the `Money` type for handling prices safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    19.99 * 0.85 = 16.991499999999998  ❌ WRONG!                         │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1999 cents * 85 = 169915  (exact, scale 4)                          │
//! │    round half-up to scale 2 → 1699 cents = 16.99                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Prices are stored with two fractional digits, so cents are an exact
//! representation. Decimal input and output go through [`rust_decimal`].
//!
//! ## Usage
//! ```rust
//! use catalog_core::money::Money;
//!
//! let price: Money = "19.99".parse().unwrap();
//! let final_price = price.apply_discount_percent(15).unwrap();
//! assert_eq!(final_price.to_string(), "16.99");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Number of fractional digits in every externally visible amount.
pub const MONEY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A non-negative monetary amount in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 cents**: exact for two-decimal prices, cheap to compare and sort
/// - **Non-negative**: every constructor rejects amounts below zero
/// - **Ord**: price sorting compares cents directly
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::money::Money;
    ///
    /// let price = Money::from_cents(1099).unwrap(); // 10.99
    /// assert_eq!(price.cents(), 1099);
    /// assert!(Money::from_cents(-1).is_err());
    /// ```
    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::InvalidAmount {
                amount: Decimal::new(cents, MONEY_SCALE).to_string(),
            });
        }
        Ok(Money(cents))
    }

    /// Creates a Money value from an exact decimal amount.
    ///
    /// Amounts with more than two fractional digits are rounded half-up to
    /// two digits.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let price = Money::from_decimal(Decimal::new(16995, 3)).unwrap(); // 16.995
    /// assert_eq!(price.cents(), 1700);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Result<Self, ValidationError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(ValidationError::InvalidAmount {
                amount: amount.to_string(),
            });
        }

        let rounded =
            amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
        let cents = rounded
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|scaled| scaled.to_i64())
            .ok_or_else(|| ValidationError::InvalidAmount {
                amount: amount.to_string(),
            })?;

        Money::from_cents(cents)
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn units(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        self.0 % 100
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns the amount as a decimal with scale 2 (`19.99`, `85.00`).
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_SCALE)
    }

    /// Applies a percentage discount and returns the resulting price.
    ///
    /// ## Rounding
    /// The exact intermediate `cents * (100 - percent)` has four fractional
    /// digits; it is rounded half-up back to cents. `percent = 0` returns the
    /// amount unchanged.
    ///
    /// ## Example
    /// ```rust
    /// use catalog_core::money::Money;
    ///
    /// let price = Money::from_cents(12000).unwrap(); // 120.00
    /// let discounted = price.apply_discount_percent(30).unwrap();
    /// assert_eq!(discounted.cents(), 8400); // 84.00
    ///
    /// assert!(price.apply_discount_percent(101).is_err());
    /// ```
    pub fn apply_discount_percent(&self, percent: u8) -> Result<Money, ValidationError> {
        if percent > 100 {
            return Err(ValidationError::InvalidPercentage {
                percent: i64::from(percent),
            });
        }
        if percent == 0 {
            return Ok(*self);
        }

        // i128 keeps the scale-4 intermediate exact for any i64 amount
        let scaled = self.0 as i128 * (100 - i128::from(percent));
        let cents = (scaled + 50) / 100;
        Ok(Money(cents as i64))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Always two fractional digits, no currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.units(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| ValidationError::InvalidAmount {
            amount: s.to_string(),
        })?;
        Money::from_decimal(amount)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = ValidationError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Money::from_decimal(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.to_decimal()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    #[test]
    fn test_from_cents() {
        let m = Money::from_cents(1099).unwrap();
        assert_eq!(m.cents(), 1099);
        assert_eq!(m.units(), 10);
        assert_eq!(m.cents_part(), 99);
    }

    #[test]
    fn test_negative_amount_rejected() {
        assert!(matches!(
            Money::from_cents(-550),
            Err(ValidationError::InvalidAmount { .. })
        ));
        assert!("-0.01".parse::<Money>().is_err());
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn test_zero_is_valid() {
        assert!(money("0").is_zero());
        assert!(money("0.00").is_zero());
    }

    #[test]
    fn test_decimal_round_half_up() {
        assert_eq!(money("16.995").cents(), 1700);
        assert_eq!(money("16.994").cents(), 1699);
        assert_eq!(money("19.99").cents(), 1999);
    }

    #[test]
    fn test_decimal_too_large_rejected() {
        assert!(matches!(
            Money::from_decimal(Decimal::MAX),
            Err(ValidationError::InvalidAmount { .. })
        ));
        assert!(matches!(
            Money::from_decimal(Decimal::from(i64::MAX)),
            Err(ValidationError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_display_has_scale_two() {
        assert_eq!(money("85").to_string(), "85.00");
        assert_eq!(money("0.5").to_string(), "0.50");
        assert_eq!(money("16.99").to_decimal().scale(), 2);
        assert_eq!(money("85").to_decimal().to_string(), "85.00");
    }

    #[test]
    fn test_discount_zero_returns_same_amount() {
        let price = money("19.99");
        assert_eq!(price.apply_discount_percent(0).unwrap(), price);
    }

    #[test]
    fn test_discount_examples() {
        assert_eq!(money("100.00").apply_discount_percent(15).unwrap(), money("85.00"));
        assert_eq!(money("100.00").apply_discount_percent(25).unwrap(), money("75.00"));
        assert_eq!(money("120.00").apply_discount_percent(30).unwrap(), money("84.00"));
        assert_eq!(money("50.00").apply_discount_percent(100).unwrap(), Money::zero());
    }

    #[test]
    fn test_discount_rounds_half_up() {
        // 19.99 * 0.85 = 16.9915
        assert_eq!(money("19.99").apply_discount_percent(15).unwrap().cents(), 1699);
        // 0.10 * 0.95 = 0.095 → 0.10
        assert_eq!(money("0.10").apply_discount_percent(5).unwrap().cents(), 10);
        // 0.01 * 0.50 = 0.005 → 0.01
        assert_eq!(money("0.01").apply_discount_percent(50).unwrap().cents(), 1);
    }

    #[test]
    fn test_discount_percentage_out_of_range() {
        assert_eq!(
            money("10.00").apply_discount_percent(101),
            Err(ValidationError::InvalidPercentage { percent: 101 })
        );
    }

    #[test]
    fn test_ordering_by_amount() {
        assert!(money("9.99") < money("10.00"));
        assert!(money("100") > money("99.99"));
    }
}
