//! # Tax Calculator
//!
//! Computes GST and compensation cess for one line from an already
//! resolved rule and an already converted quantity.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Tax Calculation Pipeline                           │
//! │                                                                         │
//! │  taxable_value, gst_rate, cess basis, supply type                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  1. Validate ranges (never clamp)                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  2. GST                                                                 │
//! │     intra-state: CGST = SGST = taxable × rate / 2 / 100                 │
//! │     inter-state: IGST       = taxable × rate / 100                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  3. Cess                                                                │
//! │     ad valorem: taxable × percent / 100                                 │
//! │     specific:   quantity × amount / per   (quantity in rule's unit)     │
//! │     compound:   ad valorem + specific                                   │
//! │     higher of:  max(ad valorem, specific)                               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  4. Totals from UNROUNDED parts, then round every field once            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All arithmetic is checked: an amount that overflows `Decimal`, or a
//! rounded amount too large for `Money`, is reported as `InvalidInput`.
//! Nothing is clamped.

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::rules::{CessRate, CessRule};
use crate::types::{Measured, SupplyType, TaxBreakdown, TaxRate};
use crate::validation::{validate_non_negative, validate_percentage};

/// What cess applies to the line.
#[derive(Debug, Clone, Copy)]
pub enum CessBasis<'a> {
    /// No cess (e.g. custom-category supplies).
    Exempt,
    /// A resolved rule and the line's quantity. For specific rates the
    /// quantity must already be in the rule's `applicable_uom`.
    Rule {
        rule: &'a CessRule,
        quantity: Measured,
    },
}

/// Computes the full breakdown for one line.
///
/// ## Errors
/// - `InvalidInput`: negative taxable value or quantity, GST rate outside
///   [0, 100], or an amount too large to represent
/// - `UnitMismatch`: a specific cess rate and a quantity in another unit
///
/// ## Example
/// ```rust
/// use cess_core::calculator::{compute, CessBasis};
/// use cess_core::types::{SupplyType, TaxRate};
/// use rust_decimal::Decimal;
///
/// let breakdown = compute(
///     Decimal::from(1000),
///     TaxRate::from_percent(Decimal::from(28)).unwrap(),
///     CessBasis::Exempt,
///     SupplyType::InterState,
/// )
/// .unwrap();
/// assert_eq!(breakdown.igst_amount.paise(), 28_000);
/// ```
pub fn compute(
    taxable_value: Decimal,
    gst_rate: TaxRate,
    cess: CessBasis<'_>,
    supply_type: SupplyType,
) -> CoreResult<TaxBreakdown> {
    validate_non_negative("taxable_value", taxable_value)?;
    validate_percentage("gst_rate", gst_rate.percent())?;

    let gst = percent_of(taxable_value, gst_rate.percent())?;
    let (cgst, sgst, igst) = if supply_type.is_intra_state() {
        let half = checked(gst.checked_div(Decimal::TWO), "gst_amount")?;
        (half, half, Decimal::ZERO)
    } else {
        (Decimal::ZERO, Decimal::ZERO, gst)
    };

    let cess_amount = match cess {
        CessBasis::Exempt => Decimal::ZERO,
        CessBasis::Rule { rule, quantity } => cess_for(rule, taxable_value, quantity)?,
    };

    let total_tax = checked(gst.checked_add(cess_amount), "total_tax")?;
    let total_amount = checked(taxable_value.checked_add(total_tax), "total_amount")?;

    Ok(TaxBreakdown {
        supply_type,
        taxable_value: Money::round_from("taxable_value", taxable_value)?,
        cess_amount: Money::round_from("cess_amount", cess_amount)?,
        cgst_amount: Money::round_from("cgst_amount", cgst)?,
        sgst_amount: Money::round_from("sgst_amount", sgst)?,
        igst_amount: Money::round_from("igst_amount", igst)?,
        total_tax: Money::round_from("total_tax", total_tax)?,
        total_amount: Money::round_from("total_amount", total_amount)?,
    })
}

/// Unrounded cess for one line under `rule`.
pub fn cess_for(rule: &CessRule, taxable_value: Decimal, quantity: Measured) -> CoreResult<Decimal> {
    match *rule.rate() {
        CessRate::AdValorem { percent } => percent_of(taxable_value, percent),
        CessRate::Specific { amount, per } => specific(rule, quantity, amount, per),
        CessRate::Compound {
            percent,
            amount,
            per,
        } => {
            let ad_valorem = percent_of(taxable_value, percent)?;
            let specific = specific(rule, quantity, amount, per)?;
            checked(ad_valorem.checked_add(specific), "cess_amount")
        }
        CessRate::HigherOf {
            percent,
            amount,
            per,
        } => {
            let ad_valorem = percent_of(taxable_value, percent)?;
            let specific = specific(rule, quantity, amount, per)?;
            Ok(ad_valorem.max(specific))
        }
    }
}

fn specific(rule: &CessRule, quantity: Measured, amount: Decimal, per: Decimal) -> CoreResult<Decimal> {
    validate_non_negative("quantity", quantity.quantity)?;

    let expected = rule.applicable_uom().ok_or_else(|| ValidationError::Required {
        field: "applicable_uom".to_string(),
    })?;
    if quantity.uom != expected {
        return Err(CoreError::UnitMismatch {
            expected,
            found: quantity.uom,
        });
    }

    // Multiply before dividing so `per` values like 3 lose as little as possible.
    let gross = checked(quantity.quantity.checked_mul(amount), "cess_amount")?;
    checked(gross.checked_div(per), "cess_amount")
}

fn percent_of(value: Decimal, percent: Decimal) -> CoreResult<Decimal> {
    let scaled = checked(value.checked_mul(percent), "taxable_value")?;
    checked(scaled.checked_div(Decimal::ONE_HUNDRED), "taxable_value")
}

fn checked(value: Option<Decimal>, field: &str) -> CoreResult<Decimal> {
    value.ok_or_else(|| {
        CoreError::InvalidInput(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: Decimal::MAX.to_string(),
        })
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HsnPattern;
    use crate::uom::Uom;
    use rust_decimal_macros::dec;

    fn rate(pct: Decimal) -> TaxRate {
        TaxRate::from_percent(pct).unwrap()
    }

    fn rule(p: &str, rate: CessRate, uom: Option<Uom>) -> CessRule {
        CessRule::new(HsnPattern::parse(p).unwrap(), rate, uom).unwrap()
    }

    #[test]
    fn test_intra_state_split() {
        let cess = rule("2402", CessRate::AdValorem { percent: dec!(5) }, None);
        let b = compute(
            dec!(1000),
            rate(dec!(28)),
            CessBasis::Rule {
                rule: &cess,
                quantity: Measured::new(dec!(10), Uom::Piece),
            },
            SupplyType::IntraState,
        )
        .unwrap();

        assert_eq!(b.taxable_value, Money::from_rupees(1000));
        assert_eq!(b.cgst_amount, Money::from_rupees(140));
        assert_eq!(b.sgst_amount, Money::from_rupees(140));
        assert_eq!(b.igst_amount, Money::zero());
        assert_eq!(b.cess_amount, Money::from_rupees(50));
        assert_eq!(b.total_tax, Money::from_rupees(330));
        assert_eq!(b.total_amount, Money::from_rupees(1330));
    }

    #[test]
    fn test_inter_state_igst() {
        let cess = rule("2402", CessRate::AdValorem { percent: dec!(5) }, None);
        let b = compute(
            dec!(1000),
            rate(dec!(28)),
            CessBasis::Rule {
                rule: &cess,
                quantity: Measured::new(dec!(10), Uom::Piece),
            },
            SupplyType::InterState,
        )
        .unwrap();

        assert_eq!(b.cgst_amount, Money::zero());
        assert_eq!(b.sgst_amount, Money::zero());
        assert_eq!(b.igst_amount, Money::from_rupees(280));
        assert_eq!(b.total_tax, Money::from_rupees(330));
    }

    #[test]
    fn test_zero_value_zero_tax() {
        let b = compute(dec!(0), rate(dec!(18)), CessBasis::Exempt, SupplyType::IntraState).unwrap();
        assert!(b.total_tax.is_zero());
        assert!(b.total_amount.is_zero());
    }

    #[test]
    fn test_specific_rate_per_tonne() {
        let coal = rule(
            "2701",
            CessRate::Specific {
                amount: dec!(400),
                per: dec!(1),
            },
            Some(Uom::Tonne),
        );
        let cess = cess_for(&coal, dec!(5000), Measured::new(dec!(2.5), Uom::Tonne)).unwrap();
        assert_eq!(cess, dec!(1000));
    }

    #[test]
    fn test_compound_rate() {
        let cigarettes = rule(
            "24022010",
            CessRate::Compound {
                percent: dec!(5),
                amount: dec!(1591),
                per: dec!(1000),
            },
            Some(Uom::Piece),
        );
        let cess = cess_for(&cigarettes, dec!(10000), Measured::new(dec!(1000), Uom::Piece)).unwrap();
        assert_eq!(cess, dec!(2091));
    }

    #[test]
    fn test_higher_of_rate() {
        let cigarettes = rule(
            "24021010",
            CessRate::HigherOf {
                percent: dec!(21),
                amount: dec!(4170),
                per: dec!(1000),
            },
            Some(Uom::Piece),
        );
        let specific_wins =
            cess_for(&cigarettes, dec!(1000), Measured::new(dec!(1000), Uom::Piece)).unwrap();
        assert_eq!(specific_wins, dec!(4170));

        let ad_valorem_wins =
            cess_for(&cigarettes, dec!(100000), Measured::new(dec!(1000), Uom::Piece)).unwrap();
        assert_eq!(ad_valorem_wins, dec!(21000));
    }

    #[test]
    fn test_specific_rate_unit_mismatch() {
        let coal = rule(
            "2701",
            CessRate::Specific {
                amount: dec!(400),
                per: dec!(1),
            },
            Some(Uom::Kilogram),
        );
        let err = compute(
            dec!(100),
            rate(dec!(5)),
            CessBasis::Rule {
                rule: &coal,
                quantity: Measured::new(dec!(3), Uom::Litre),
            },
            SupplyType::IntraState,
        )
        .unwrap_err();

        assert!(matches!(
            err,
            CoreError::UnitMismatch {
                expected: Uom::Kilogram,
                found: Uom::Litre
            }
        ));
    }

    #[test]
    fn test_ad_valorem_ignores_quantity_unit() {
        let cess = rule("2202", CessRate::AdValorem { percent: dec!(12) }, None);
        let amount = cess_for(&cess, dec!(500), Measured::new(dec!(3), Uom::Litre)).unwrap();
        assert_eq!(amount, dec!(60));
    }

    #[test]
    fn test_negative_inputs_rejected() {
        let err = compute(dec!(-1), rate(dec!(18)), CessBasis::Exempt, SupplyType::IntraState)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ValidationError::Negative { .. })));

        let coal = rule(
            "2701",
            CessRate::Specific {
                amount: dec!(400),
                per: dec!(1),
            },
            Some(Uom::Tonne),
        );
        let err = cess_for(&coal, dec!(0), Measured::new(dec!(-2), Uom::Tonne)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_each_field_rounded_once() {
        // 0.15 × 18% = 0.027 → CGST 0.0135 each, rounded to 0.01; total 0.027 → 0.03
        let b = compute(dec!(0.15), rate(dec!(18)), CessBasis::Exempt, SupplyType::IntraState)
            .unwrap();
        assert_eq!(b.cgst_amount.paise(), 1);
        assert_eq!(b.sgst_amount.paise(), 1);
        assert_eq!(b.total_tax.paise(), 3);
    }

    #[test]
    fn test_overflow_is_invalid_input() {
        let cess = rule("2402", CessRate::AdValorem { percent: dec!(290) }, None);
        let err = compute(
            Decimal::MAX,
            rate(dec!(28)),
            CessBasis::Rule {
                rule: &cess,
                quantity: Measured::new(dec!(1), Uom::Piece),
            },
            SupplyType::InterState,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(ValidationError::OutOfRange { .. })));
    }

    #[test]
    fn test_amount_too_large_for_money_is_invalid_input() {
        // 1e12 × 1e8 fits in Decimal but not in i64 paise
        let cess = rule("2402", CessRate::AdValorem { percent: dec!(5) }, None);
        let err = compute(
            dec!(1000000000000) * dec!(100000000),
            rate(dec!(28)),
            CessBasis::Rule {
                rule: &cess,
                quantity: Measured::new(dec!(1000000000000), Uom::Piece),
            },
            SupplyType::IntraState,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CoreError::InvalidInput(ValidationError::OutOfRange { ref field, .. }) if field == "taxable_value"
        ));
    }
}
