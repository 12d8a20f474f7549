//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TWO DECIMAL PLACES, ALWAYS                                             │
//! │                                                                         │
//! │  Every amount on a receipt is rounded to the cent. Storing cents as    │
//! │  i64 makes that true by construction:                                   │
//! │                                                                         │
//! │    line total  = unit price × qty          (exact, no rounding)        │
//! │    line GST    = round_half_up(total × rate) (the ONLY rounding step)  │
//! │    subtotal    = Σ line totals             (exact)                     │
//! │    GST         = Σ line GST                (sum of rounded values)     │
//! │    total       = subtotal + GST            (exact)                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tillslip_core::money::Money;
//!
//! let price = Money::from_cents(350); // $3.50
//! let line = price.checked_multiply_quantity(10).unwrap();
//! assert_eq!(line.cents(), 3500);
//! assert_eq!(line.to_string(), "$35.00");
//! assert!(price.checked_multiply_quantity(i64::MAX).is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// Signed so that a malformed negative price is representable and can be
/// rejected by validation instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tillslip_core::money::Money;
    ///
    /// let price = Money::from_cents(8250); // $82.50
    /// assert_eq!(price.cents(), 8250);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Parses a decimal amount such as `"82.50"`, `"7"` or `"$3.5"`.
    ///
    /// At most two fractional digits are accepted; the value is never
    /// rounded on the way in.
    ///
    /// ## Example
    /// ```rust
    /// use tillslip_core::money::Money;
    ///
    /// assert_eq!(Money::parse_decimal("82.50").unwrap().cents(), 8250);
    /// assert_eq!(Money::parse_decimal("$3.5").unwrap().cents(), 350);
    /// assert!(Money::parse_decimal("1.005").is_err());
    /// ```
    pub fn parse_decimal(input: &str) -> Result<Self, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let unsigned = unsigned.strip_prefix('$').unwrap_or(unsigned);

        let (whole, frac) = match unsigned.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (unsigned, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(invalid("must contain digits"));
        }
        if frac.len() > 2 {
            return Err(invalid("at most two decimal places are allowed"));
        }
        if !whole.chars().chain(frac.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid("must be a decimal number"));
        }

        let major: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("amount is too large"))?
        };
        let minor: i64 = match frac.len() {
            0 => 0,
            1 => frac.parse::<i64>().map_err(|_| invalid("bad cents"))? * 10,
            _ => frac.parse().map_err(|_| invalid("bad cents"))?,
        };

        let cents = major
            .checked_mul(100)
            .and_then(|c| c.checked_add(minor))
            .ok_or_else(|| invalid("amount is too large"))?;

        Ok(Money(if negative { -cents } else { cents }))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
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

    /// Checks if the value is greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is less than zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, rounding half up to the cent.
    ///
    /// ## Rounding
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  ROUND HALF UP (away from zero)                                     │
    /// │                                                                     │
    /// │  tax_cents = (amount_cents × bps + 5000) / 10000                    │
    /// │                                                                     │
    /// │    $0.05 × 10% = 0.5¢  → 1¢                                        │
    /// │    $0.04 × 10% = 0.4¢  → 0¢                                        │
    /// │    $3.50 × 10% = 35¢   → 35¢                                       │
    /// │                                                                     │
    /// │  Negative amounts mirror positive ones so -0.5¢ → -1¢.             │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Example
    /// ```rust
    /// use tillslip_core::money::Money;
    /// use tillslip_core::types::TaxRate;
    ///
    /// let amount = Money::from_cents(10000); // $100.00
    /// let gst = amount.calculate_tax(TaxRate::from_bps(1000));
    /// assert_eq!(gst.cents(), 1000); // $10.00
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 so that large line totals cannot overflow the product
        let scaled = self.0.unsigned_abs() as i128 * rate.bps() as i128;
        let rounded = (scaled + 5000) / 10000;
        let tax_cents = if self.0 < 0 { -rounded } else { rounded };
        // rates above 100% can push the result past i64
        Money::from_cents(tax_cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }

    /// Multiplies a unit price by a quantity, `None` if the result does not
    /// fit in i64 cents.
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money as `$12.34`.
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

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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
        assert_eq!(format!("{}", Money::from_cents(1400)), "$14.00");
        assert_eq!(format!("{}", Money::from_cents(385)), "$3.85");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(Money::parse_decimal("82.50").unwrap(), Money::from_cents(8250));
        assert_eq!(Money::parse_decimal("7").unwrap(), Money::from_cents(700));
        assert_eq!(Money::parse_decimal(".5").unwrap(), Money::from_cents(50));
        assert_eq!(Money::parse_decimal(" $100.00 ").unwrap(), Money::from_cents(10000));
        assert_eq!(Money::parse_decimal("-1.25").unwrap(), Money::from_cents(-125));

        assert!(Money::parse_decimal("").is_err());
        assert!(Money::parse_decimal(".").is_err());
        assert!(Money::parse_decimal("1.005").is_err());
        assert!(Money::parse_decimal("12a").is_err());
        assert!(Money::parse_decimal("99999999999999999999").is_err());
    }

    #[test]
    fn test_tax_calculation_basic() {
        let amount = Money::from_cents(3500);
        let tax = amount.calculate_tax(TaxRate::from_bps(1000));
        assert_eq!(tax.cents(), 350);
    }

    #[test]
    fn test_tax_rounds_half_up() {
        let rate = TaxRate::from_bps(1000);
        assert_eq!(Money::from_cents(5).calculate_tax(rate).cents(), 1);
        assert_eq!(Money::from_cents(4).calculate_tax(rate).cents(), 0);
        assert_eq!(Money::from_cents(15).calculate_tax(rate).cents(), 2);
        assert_eq!(Money::from_cents(25).calculate_tax(rate).cents(), 3);
        assert_eq!(Money::from_cents(-5).calculate_tax(rate).cents(), -1);
    }

    #[test]
    fn test_checked_multiply_quantity() {
        let unit_price = Money::from_cents(700);
        assert_eq!(unit_price.checked_multiply_quantity(2), Some(Money::from_cents(1400)));
        assert_eq!(unit_price.checked_multiply_quantity(5), Some(Money::from_cents(3500)));

        let huge = Money::from_cents(10_000_000_000_000_000);
        assert_eq!(huge.checked_multiply_quantity(1000), None);
    }

    #[test]
    fn test_checked_add() {
        let a = Money::from_cents(100);
        assert_eq!(a.checked_add(Money::from_cents(250)), Some(Money::from_cents(350)));
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn test_tax_on_extreme_rate_saturates() {
        let tax = Money::from_cents(i64::MAX).calculate_tax(TaxRate::from_bps(20000));
        assert_eq!(tax.cents(), i64::MAX);
    }
}
