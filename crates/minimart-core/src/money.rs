//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Summing float subtotals and rounding at the end drifts by a cent      │
//! │  on long baskets.                                                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    JSON 2.50 ──► 250 cents (rounded ONCE, at the HTTP boundary)        │
//! │    250 × 3 = 750, 1000 − 750 = 250 (exact from here on)                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use minimart_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(250); // $2.50
//!
//! // Arithmetic operations
//! let subtotal = price.checked_multiply_quantity(3).unwrap(); // $7.50
//! let total = subtotal + Money::from_cents(125);              // $8.75
//! assert_eq!(total.cents(), 875);
//!
//! // Wire amounts are converted exactly once
//! let paid = Money::from_major(10.0).unwrap();
//! assert_eq!((paid - subtotal).cents(), 250);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: change and stock-value arithmetic never needs a cast
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for JSON serialization
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  Product.price_cents ──┬──► SaleItem.price_cents ──► SaleItem.subtotal  │
/// │                        │                                                │
/// │                        └──► Rendered as 2.5 in JSON responses           │
/// │                                                                         │
/// │  Σ subtotal ──► Sale.total ──► paid − total ──► Sale.change             │
/// │                                                                         │
/// │  EVERY monetary value in the system flows through this type            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use minimart_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal wire amount (e.g. `2.5` from JSON) into cents.
    ///
    /// The amount is scaled by 100 and rounded half-to-even, so `0.125`
    /// becomes 12 cents and `0.135` becomes 14 cents. This is the ONLY
    /// place a float becomes money; everything downstream is integer math.
    ///
    /// ## Errors
    /// `ValidationError::InvalidFormat` for NaN, infinities and values too
    /// large to represent in cents.
    ///
    /// ## Example
    /// ```rust
    /// use minimart_core::money::Money;
    ///
    /// assert_eq!(Money::from_major(2.5).unwrap().cents(), 250);
    /// assert_eq!(Money::from_major(0.1 + 0.2).unwrap().cents(), 30);
    /// assert!(Money::from_major(f64::NAN).is_err());
    /// ```
    pub fn from_major(amount: f64) -> Result<Self, ValidationError> {
        if !amount.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        let scaled = amount * 100.0;
        if scaled.abs() >= i64::MAX as f64 {
            return Err(ValidationError::InvalidFormat {
                field: "amount".to_string(),
                reason: "is too large".to_string(),
            });
        }

        Ok(Money(round_half_even(scaled)))
    }

    /// Returns the amount in major units for JSON output (`750` → `7.5`).
    ///
    /// Display only; never feed the result back into arithmetic.
    #[inline]
    pub fn as_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    ///
    /// ## Example
    /// ```rust
    /// use minimart_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.dollars(), 10);
    /// ```
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
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

    /// Multiplies money by a quantity; `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use minimart_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(250); // $2.50
    /// let subtotal = unit_price.checked_multiply_quantity(3);
    /// assert_eq!(subtotal, Some(Money::from_cents(750))); // $7.50
    /// assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
    /// ```
    ///
    /// ## User Workflow
    /// ```text
    /// Product: Chocolate Milk $2.50
    /// Quantity: 3
    ///      │
    ///      ▼
    /// checked_multiply_quantity(3) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Subtotal: $7.50
    /// ```
    #[inline]
    pub fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        self.0.checked_mul(qty).map(Money)
    }

    /// Overflow-checked addition.
    #[inline]
    pub fn checked_add(&self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }
}

/// Rounds to the nearest integer, ties to even.
fn round_half_even(value: f64) -> i64 {
    let floor = value.floor();
    let diff = value - floor;

    let rounded = if diff > 0.5 {
        floor + 1.0
    } else if diff < 0.5 {
        floor
    } else if floor % 2.0 == 0.0 {
        floor
    } else {
        floor + 1.0
    };

    rounded as i64
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// Used in log lines and error messages. JSON bodies use [`Money::as_major`].
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

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
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
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(750);

        assert_eq!((a + b).cents(), 1750);
        assert_eq!((a - b).cents(), 250);
    }

    #[test]
    fn test_from_major_common_amounts() {
        assert_eq!(Money::from_major(2.5).unwrap().cents(), 250);
        assert_eq!(Money::from_major(10.0).unwrap().cents(), 1000);
        assert_eq!(Money::from_major(0.0).unwrap().cents(), 0);
        assert_eq!(Money::from_major(19.99).unwrap().cents(), 1999);
        // 0.1 + 0.2 is 30.000000000000004 after scaling
        assert_eq!(Money::from_major(0.1 + 0.2).unwrap().cents(), 30);
    }

    #[test]
    fn test_from_major_ties_round_to_even() {
        assert_eq!(round_half_even(12.5), 12);
        assert_eq!(round_half_even(13.5), 14);
        assert_eq!(round_half_even(-0.5), 0);
        assert_eq!(round_half_even(-1.5), -2);
        assert_eq!(round_half_even(7.4999), 7);
        assert_eq!(round_half_even(7.5001), 8);
    }

    #[test]
    fn test_from_major_rejects_non_finite() {
        assert!(Money::from_major(f64::NAN).is_err());
        assert!(Money::from_major(f64::INFINITY).is_err());
        assert!(Money::from_major(f64::NEG_INFINITY).is_err());
        assert!(Money::from_major(1e300).is_err());
    }

    #[test]
    fn test_as_major() {
        assert_eq!(Money::from_cents(750).as_major(), 7.5);
        assert_eq!(Money::from_cents(250).as_major(), 2.5);
        assert_eq!(Money::from_cents(0).as_major(), 0.0);
    }

    #[test]
    fn test_checked_operations() {
        let price = Money::from_cents(i64::MAX / 2);
        assert!(price.checked_multiply_quantity(3).is_none());
        assert_eq!(
            Money::from_cents(250).checked_multiply_quantity(3),
            Some(Money::from_cents(750))
        );
        assert!(Money::from_cents(i64::MAX)
            .checked_add(Money::from_cents(1))
            .is_none());
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
        assert!(Money::from_cents(-100).is_negative());
        assert_eq!(Money::default(), zero);
    }
}
