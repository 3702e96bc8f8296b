//! Money types with precision guarantees for financial calculations.
//!
//! # Design Rationale
//! All monetary values use `Decimal` to avoid floating-point errors.
//! We define newtypes for semantic clarity and type safety.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// Represents a monetary amount with 2-decimal precision for display,
/// but internally maintains full precision for calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(dec!(0));

    /// Create a new Money value from a raw decimal.
    #[inline]
    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    /// Create from cents (integer)
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, 2))
    }

    /// Get the raw decimal value
    #[inline]
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Round to nearest cent using banker's rounding (round half to even)
    #[inline]
    pub fn round_cents(&self) -> Self {
        Money(self.0.round_dp(2))
    }

    /// Check if value is negative
    #[inline]
    pub fn is_negative(&self) -> bool {
        self.0 < dec!(0)
    }

    /// Check if value is zero
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == dec!(0)
    }

    /// Return the maximum of two values
    #[inline]
    pub fn max(self, other: Self) -> Self {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    /// Return the minimum of two values
    #[inline]
    pub fn min(self, other: Self) -> Self {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Clamp value to zero (no negatives)
    #[inline]
    pub fn clamp_zero(self) -> Self {
        self.max(Money::ZERO)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::ZERO
    }
}

impl Add for Money {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Money(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Money(self.0 - rhs.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Decimal) -> Self::Output {
        Money(self.0 * rhs)
    }
}

impl Div<Decimal> for Money {
    type Output = Self;
    #[inline]
    fn div(self, rhs: Decimal) -> Self::Output {
        Money(self.0 / rhs)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

/// Represents a tax rate as a decimal fraction.
/// Stored as the actual decimal value (e.g., 0.0725 for 7.25%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rate(Decimal);

impl Rate {
    pub const ZERO: Rate = Rate(dec!(0));

    /// Create a rate from decimal form (e.g., 0.0725 for 7.25%)
    #[inline]
    pub fn from_decimal(value: Decimal) -> Self {
        Rate(value)
    }

    /// Create a rate from percentage form (e.g., 7.25 for 7.25%)
    #[inline]
    pub fn from_percentage(percent: Decimal) -> Self {
        Rate(percent / dec!(100))
    }

    /// Get the decimal value
    #[inline]
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// Get as percentage (e.g., 7.25)
    #[inline]
    pub fn as_percentage(&self) -> Decimal {
        self.0 * dec!(100)
    }

    /// Apply this rate to a money amount (unrounded)
    #[inline]
    pub fn apply(&self, amount: Money) -> Money {
        amount * self.0
    }
}

impl Default for Rate {
    fn default() -> Self {
        Rate::ZERO
    }
}

impl Add for Rate {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Rate(self.0 + rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_arithmetic() {
        let a = Money::from_cents(1000); // $10.00
        let b = Money::from_cents(250); // $2.50

        assert_eq!((a + b).as_decimal(), dec!(12.50));
        assert_eq!((a - b).as_decimal(), dec!(7.50));
    }

    #[test]
    fn test_money_rounding_is_bankers() {
        let m = Money::new(dec!(10.125));
        assert_eq!(m.round_cents().as_decimal(), dec!(10.12));
        let n = Money::new(dec!(10.135));
        assert_eq!(n.round_cents().as_decimal(), dec!(10.14));
    }

    #[test]
    fn test_clamp_zero() {
        let m = Money::new(dec!(-3.50));
        assert_eq!(m.clamp_zero(), Money::ZERO);
        assert!(m.is_negative());
    }

    #[test]
    fn test_rate_application() {
        let rate = Rate::from_percentage(dec!(7.25));
        let amount = Money::new(dec!(10000));
        let tax = rate.apply(amount);
        assert_eq!(tax.as_decimal(), dec!(725));
    }
}
