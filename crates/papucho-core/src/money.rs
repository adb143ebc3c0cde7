//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Ingredient deltas are added and subtracted over and over:              │
//! │    8800.0 + 0.1 * 3 - 0.3 = 8800.000000000002  ❌ WRONG on a ticket!   │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    880000 + 10 * 3 - 30 = 880000 cents                                 │
//! │    Every ticket column lines up because every amount is exact          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The flat files inherited from the previous system store prices as JSON
//! floats. Those are converted exactly once, at the storage boundary, with
//! [`Money::from_major_f64`] and [`Money::to_major_f64`].
//!
//! ## Usage
//! ```rust
//! use papucho_core::money::Money;
//!
//! let burger = Money::from_major(8800);         // $8800.00
//! let extra_patty = Money::from_major(1000);    // $1000.00
//!
//! let total = burger + extra_patty * 2_i64;
//! assert_eq!(total.to_string(), "$10800.00");
//! assert_eq!(extra_patty.signed(), "+$1000.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: Removal credits are negative, and a pathological
///   catalog can even drive a unit price below zero
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                                                                         │
/// │  Product.base_price ──┬──► compute_unit_price ──► line subtotal        │
/// │                       │          ▲                                      │
/// │  Ingredient.extra_price ─────────┤                                      │
/// │  Ingredient.removal_price ───────┘                                      │
/// │                                                                         │
/// │  Order.total ──► "TOTAL A PAGAR:                        $9800.00"      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use papucho_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole currency units.
    ///
    /// ## Example
    /// ```rust
    /// use papucho_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(500).cents(), 50_000);
    /// ```
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major * 100)
    }

    /// Converts a legacy floating point price into cents, rounding to the
    /// nearest cent.
    ///
    /// Only the storage layer calls this, when reading `"precio": 8800.0`
    /// style values. Non-finite input becomes zero.
    ///
    /// ```rust
    /// use papucho_core::money::Money;
    ///
    /// assert_eq!(Money::from_major_f64(8800.0).cents(), 880_000);
    /// assert_eq!(Money::from_major_f64(0.1 + 0.2).cents(), 30);
    /// ```
    pub fn from_major_f64(value: f64) -> Self {
        if !value.is_finite() {
            return Money::zero();
        }
        Money((value * 100.0).round() as i64)
    }

    /// Converts back to the legacy floating point representation.
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Renders the amount with an explicit sign: `+$600.00`, `-$500.00`.
    ///
    /// Ingredient sub-lines on tickets always carry a sign so the kitchen can
    /// tell an extra from a removal at a glance.
    pub fn signed(&self) -> String {
        if self.is_negative() {
            self.to_string()
        } else {
            format!("+{}", self)
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money the way tickets print it: `$8800.00`, `-$5.50`.
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

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by i64 (quantities, unit counts).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Multiplication by u32 (ingredient counts).
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0 * qty as i64)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
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
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_major(8800)), "$8800.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_signed() {
        assert_eq!(Money::from_major(600).signed(), "+$600.00");
        assert_eq!(Money::from_major(-500).signed(), "-$500.00");
        assert_eq!(Money::zero().signed(), "+$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3_i64).cents(), 3000);
        assert_eq!((b * 2_u32).cents(), 1000);
        assert_eq!((-a).cents(), -1000);

        let mut c = a;
        c += b;
        c -= Money::from_cents(200);
        assert_eq!(c.cents(), 1300);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 250, -50]
            .into_iter()
            .map(Money::from_cents)
            .sum();
        assert_eq!(total.cents(), 300);
    }

    #[test]
    fn test_legacy_float_boundary() {
        assert_eq!(Money::from_major_f64(8800.0), Money::from_major(8800));
        assert_eq!(Money::from_major_f64(12.345).cents(), 1235);
        assert_eq!(Money::from_major_f64(f64::NAN), Money::zero());
        assert!((Money::from_cents(150).to_major_f64() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_and_checks() {
        assert!(Money::zero().is_zero());
        assert!(!Money::from_cents(100).is_negative());
        assert!(Money::from_cents(-100).is_negative());
    }
}
