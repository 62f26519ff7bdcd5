//! # Money Module
//!
//! Provides the `Money` type for final, rounded monetary amounts.
//!
//! ## Two Number Types
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Decimal (rust_decimal)            Money (this module)                  │
//! │  ──────────────────────            ───────────────────                  │
//! │  quantity × unit_price             integer paise (i64)                  │
//! │  taxable × rate / 100              rounded ONCE, half-up                │
//! │  full precision, no rounding       what a breakdown reports             │
//! │                                                                         │
//! │  compute in Decimal ──────► Money::round_from(total) ──────► output     │
//! │                                                                         │
//! │  Rounding intermediate values compounds error:                          │
//! │    round(0.333) + round(0.333) + round(0.333) = 0.99                    │
//! │    round(0.333 + 0.333 + 0.333)               = 1.00                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use cess_core::money::Money;
//! use rust_decimal::Decimal;
//!
//! let cgst = Money::round_from("cgst", Decimal::new(140_005, 3)).unwrap(); // 140.005
//! assert_eq!(cgst.paise(), 14001);                                          // ₹140.01
//! assert_eq!(cgst.to_string(), "₹140.01");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::validation::ValidationResult;

/// Currency precision: amounts are reported to the paisa.
pub const CURRENCY_DECIMALS: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (1/100 of a rupee).
///
/// ## Design Decisions
/// - **i64 (signed)**: Same representation as the rest of the ledger world
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Only built from rounded values**: there is no `from_f64`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Rounds an unrounded decimal amount to the paisa, half-up.
    ///
    /// `MidpointAwayFromZero` is round-half-up for the non-negative amounts
    /// the calculator produces: `0.125 → 0.13`, `0.124 → 0.12`.
    ///
    /// ## Errors
    /// `OutOfRange` on `field` when the rounded amount does not fit in
    /// `i64` paise (above ₹9.2 × 10¹⁶).
    pub fn round_from(field: &str, amount: Decimal) -> ValidationResult<Self> {
        amount
            .round_dp_with_strategy(CURRENCY_DECIMALS, RoundingStrategy::MidpointAwayFromZero)
            .checked_mul(Decimal::ONE_HUNDRED)
            .and_then(|paise| paise.to_i64())
            .map(Money)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: field.to_string(),
                min: Money(i64::MIN).to_decimal().to_string(),
                max: Money(i64::MAX).to_decimal().to_string(),
            })
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the whole-rupee portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value as a two-decimal `Decimal` (e.g. `1330.00`).
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, CURRENCY_DECIMALS)
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
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows rupees with two decimals. For debugging and logs; clients
/// format for their own locale.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}₹{}.{:02}",
            sign,
            self.rupees().abs(),
            self.paise_part()
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
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(133_050);
        assert_eq!(money.paise(), 133_050);
        assert_eq!(money.rupees(), 1330);
        assert_eq!(money.paise_part(), 50);
        assert_eq!(Money::from_rupees(50).paise(), 5000);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(133_000).to_string(), "₹1330.00");
        assert_eq!(Money::from_paise(5).to_string(), "₹0.05");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
    }

    fn round(amount: Decimal) -> i64 {
        Money::round_from("amount", amount).unwrap().paise()
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round(dec!(0.125)), 13);
        assert_eq!(round(dec!(0.124)), 12);
        assert_eq!(round(dec!(0.135)), 14);
        assert_eq!(round(dec!(140)), 14000);
        assert_eq!(round(dec!(2.5)), 250);
    }

    #[test]
    fn test_to_decimal_keeps_two_places() {
        let value = Money::from_paise(133_000).to_decimal();
        assert_eq!(value, dec!(1330.00));
        assert_eq!(value.to_string(), "1330.00");
    }

    /// Rounding once at the end differs from summing rounded parts.
    #[test]
    fn test_single_rounding_documented() {
        let part = dec!(0.333);
        assert_eq!(round(part) + round(part) + round(part), 99);
        assert_eq!(round(part + part + part), 100);
    }

    #[test]
    fn test_amount_beyond_paise_range_is_rejected() {
        // 1e20 rupees is a valid Decimal but 1e22 paise overflows i64
        let err = Money::round_from("total_amount", dec!(100000000000000000000)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::OutOfRange { ref field, .. } if field == "total_amount"
        ));

        let largest = Money::from_paise(i64::MAX).to_decimal();
        assert_eq!(Money::round_from("x", largest).unwrap().paise(), i64::MAX);
        assert!(Money::round_from("x", largest + dec!(0.01)).is_err());
    }
}
