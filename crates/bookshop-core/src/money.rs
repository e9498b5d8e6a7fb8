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
//! │  A bill of 3 × 19.99 summed as f64 can print as 59.96999999...          │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents (fixed point, 2 decimals)                  │
//! │    1999 cents × 3 = 5997 cents = "59.97", always                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bookshop_core::money::Money;
//!
//! // Create from cents (preferred)
//! let price = Money::from_cents(1999); // 19.99
//!
//! // Or parse the decimal string the frontend sends
//! let parsed = Money::parse_decimal("19.99").unwrap();
//! assert_eq!(price, parsed);
//!
//! let line = price * 3;
//! assert_eq!(line.to_string(), "59.97");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents (two fixed decimal places).
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic never panics on intermediate negatives;
///   bill amounts themselves are validated as non-negative
/// - **Single field tuple struct**: Zero-cost abstraction over i64
///
/// ## Where Money is Used
/// ```text
/// Book.price_cents ──► BillLine.unit_price ──► BillItem.total_price
///                                                    │
///                              Σ ──► Bill.subtotal ──┴─► tax (10%) ──► total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use bookshop_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
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

    /// Parses a decimal amount such as `"100"`, `"12.5"` or `"19.99"`.
    ///
    /// ## Rules
    /// - Digits with an optional `.` and at most two fractional digits
    /// - No sign: prices are never negative
    /// - Parsing is exact; no value ever passes through `f64`
    ///
    /// ## Example
    /// ```rust
    /// use bookshop_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("12.5").unwrap().cents(), 1250);
    /// assert_eq!(Money::parse_decimal(" 100.00 ").unwrap().cents(), 10000);
    /// assert!(Money::parse_decimal("1.999").is_err());
    /// assert!(Money::parse_decimal("-3").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Money, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: reason.to_string(),
        };

        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::Required {
                field: "price".to_string(),
            });
        }

        let (whole, fraction) = match input.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (input, ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("expected a decimal number"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("expected a non-negative decimal number"));
        }
        if fraction.len() > 2 {
            return Err(invalid("at most 2 decimal places are allowed"));
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount is too large"))?
        };
        let fraction_cents: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid("bad fraction"))? * 10,
            _ => fraction.parse().map_err(|_| invalid("bad fraction"))?,
        };

        whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction_cents))
            .map(Money)
            .ok_or_else(|| invalid("amount is too large"))
    }

    /// Calculates tax rounded half-up to the cent.
    ///
    /// ## Implementation
    /// Integer math: `(cents * bps + 5000) / 10000`.
    /// The +5000 is half of the divisor, so x.5 cents rounds up.
    ///
    /// ## Example
    /// ```rust
    /// use bookshop_core::money::Money;
    /// use bookshop_core::types::TaxRate;
    ///
    /// // 0.05 × 10% = 0.005 → rounds up to 0.01
    /// let tax = Money::from_cents(5).calculate_tax(TaxRate::from_bps(1000));
    /// assert_eq!(tax.cents(), 1);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so that large subtotals cannot overflow before the division
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use bookshop_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal with two places (`"275.00"`), the format bills are printed
/// and returned to the frontend in.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

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

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(27500).to_string(), "275.00");
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(5).to_string(), "0.05");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("100.00").unwrap().cents(), 10000);
        assert_eq!(Money::parse_decimal("100").unwrap().cents(), 10000);
        assert_eq!(Money::parse_decimal("12.5").unwrap().cents(), 1250);
        assert_eq!(Money::parse_decimal("0.07").unwrap().cents(), 7);
        assert_eq!(Money::parse_decimal(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse_decimal("3.").unwrap().cents(), 300);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(matches!(
            Money::parse_decimal(""),
            Err(ValidationError::Required { .. })
        ));
        assert!(Money::parse_decimal(".").is_err());
        assert!(Money::parse_decimal("abc").is_err());
        assert!(Money::parse_decimal("1,50").is_err());
        assert!(Money::parse_decimal("-1.00").is_err());
        assert!(Money::parse_decimal("1.005").is_err());
        assert!(Money::parse_decimal("1e3").is_err());
        assert!(Money::parse_decimal("99999999999999999999").is_err());
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        let result: Money = a * 3;
        assert_eq!(result.cents(), 3000);

        let mut acc = Money::zero();
        acc += b;
        acc += b;
        assert_eq!(acc.cents(), 1000);
    }

    #[test]
    fn test_sum() {
        let total: Money = [1999, 1, 5000].into_iter().map(Money::from_cents).sum();
        assert_eq!(total.cents(), 7000);

        let empty: Money = std::iter::empty::<Money>().sum();
        assert!(empty.is_zero());
    }

    #[test]
    fn test_tax_calculation_basic() {
        let amount = Money::from_cents(25000);
        let tax = amount.calculate_tax(TaxRate::from_bps(1000));
        assert_eq!(tax.cents(), 2500);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        let rate = TaxRate::from_bps(1000);
        // 0.15 × 10% = 0.015 → 0.02
        assert_eq!(Money::from_cents(15).calculate_tax(rate).cents(), 2);
        // 0.14 × 10% = 0.014 → 0.01
        assert_eq!(Money::from_cents(14).calculate_tax(rate).cents(), 1);
        // 0.25 × 10% = 0.025 → 0.03 (half-up, not half-even)
        assert_eq!(Money::from_cents(25).calculate_tax(rate).cents(), 3);
    }

    #[test]
    fn test_no_float_drift() {
        // 0.10 + 0.20 must be exactly 0.30
        let sum = Money::parse_decimal("0.10").unwrap() + Money::parse_decimal("0.20").unwrap();
        assert_eq!(sum, Money::from_cents(30));
    }
}
