//! # Lookup Service
//!
//! The facade callers use: one transaction context in, one breakdown or one
//! typed error out.
//!
//! ## Orchestration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  TransactionContext                                                     │
//! │        │                                                                │
//! │        ├──► supply type  (origin == destination ?)                      │
//! │        │                                                                │
//! │        ├──► resolve cess rule  (skipped for the custom category)        │
//! │        │                                                                │
//! │        ├──► specific rate? convert quantity into the rule's unit        │
//! │        │    (not convertible: declared quantity passes through and      │
//! │        │     the calculator reports UnitMismatch)                       │
//! │        │                                                                │
//! │        ├──► taxable value = declared quantity × unit price (in INR)     │
//! │        │                                                                │
//! │        ├──► GST rate  (explicit, or resolved from the GST schedule)     │
//! │        │                                                                │
//! │        └──► TaxCalculator ──► TaxBreakdown                              │
//! │                                                                         │
//! │  Exactly one `tax_lookup` event is logged per call, success or not.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The service holds only shared read-only state, so one instance can serve
//! any number of concurrent lookups.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::calculator::{self, CessBasis};
use crate::currency::{CurrencyConverter, PassThrough};
use crate::error::{CoreResult, ValidationError};
use crate::rules::{CessRule, RuleTable};
use crate::types::{CurrencyCode, Measured, TaxBreakdown, TransactionContext};
use crate::uom::convert;
use crate::validation::validate_non_negative;

/// Computes tax breakdowns against a fixed rule table.
#[derive(Clone)]
pub struct LookupService {
    rules: Arc<RuleTable>,
    currency: Arc<dyn CurrencyConverter>,
}

impl LookupService {
    /// Creates a service over `rules` with the pass-through currency
    /// converter.
    pub fn new(rules: Arc<RuleTable>) -> Self {
        LookupService {
            rules,
            currency: Arc::new(PassThrough),
        }
    }

    /// Replaces the currency converter.
    pub fn with_currency(mut self, currency: Arc<dyn CurrencyConverter>) -> Self {
        self.currency = currency;
        self
    }

    /// Computes the breakdown for one line.
    ///
    /// Errors from any step are returned unchanged.
    ///
    /// ## Example
    /// ```rust
    /// use std::sync::Arc;
    /// use cess_core::prelude::*;
    /// use rust_decimal::Decimal;
    ///
    /// let table = RuleTable::new().with_cess_rule(
    ///     CessRule::ad_valorem(HsnPattern::parse("2402").unwrap(), Decimal::from(5)).unwrap(),
    /// );
    /// let service = LookupService::new(Arc::new(table));
    ///
    /// let mh = StateCode::parse("MH").unwrap();
    /// let ctx = TransactionContext::new(
    ///     HsnCode::parse("2402").unwrap(),
    ///     Decimal::from(10),
    ///     Uom::Piece,
    ///     Decimal::from(100),
    ///     mh.clone(),
    ///     mh,
    /// )
    /// .with_gst_rate(TaxRate::from_percent(Decimal::from(28)).unwrap());
    ///
    /// let breakdown = service.lookup(&ctx).unwrap();
    /// assert_eq!(breakdown.total_amount, Money::from_rupees(1330));
    /// ```
    pub fn lookup(&self, ctx: &TransactionContext) -> CoreResult<TaxBreakdown> {
        let result = self.compute(ctx);
        log_outcome(ctx, &result);
        result
    }

    fn compute(&self, ctx: &TransactionContext) -> CoreResult<TaxBreakdown> {
        validate_non_negative("quantity", ctx.quantity)?;
        validate_non_negative("unit_price", ctx.unit_price)?;

        let supply_type = ctx.supply_type();

        let cess_rule = if ctx.category.applies_auto_cess() {
            Some(
                self.rules
                    .resolve_cess(&ctx.hsn_code, Some(&ctx.destination_state))?,
            )
        } else {
            None
        };

        let cess = match cess_rule {
            Some(rule) => CessBasis::Rule {
                rule,
                quantity: quantity_for(rule, ctx.measured())?,
            },
            None => CessBasis::Exempt,
        };

        let unit_price =
            self.currency
                .convert_currency(ctx.unit_price, &ctx.currency, &CurrencyCode::inr());
        let taxable_value = ctx.quantity.checked_mul(unit_price).ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "taxable_value".to_string(),
                min: "0".to_string(),
                max: Decimal::MAX.to_string(),
            }
        })?;

        let gst_rate = match ctx.gst_rate {
            Some(rate) => rate,
            None => self.rules.resolve_gst(&ctx.hsn_code)?.rate,
        };

        calculator::compute(taxable_value, gst_rate, cess, supply_type)
    }
}

impl std::fmt::Debug for LookupService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupService")
            .field("cess_rules", &self.rules.cess_rule_count())
            .field("gst_slabs", &self.rules.gst_slab_count())
            .finish_non_exhaustive()
    }
}

/// Quantity handed to the calculator for `rule`.
///
/// Only specific rates care about units. When the declared unit cannot be
/// converted into the rule's unit the declared quantity is returned as is.
fn quantity_for(rule: &CessRule, declared: Measured) -> CoreResult<Measured> {
    match rule.applicable_uom() {
        Some(target) if rule.rate().needs_quantity() && declared.uom.converts_to(target) => {
            let quantity = convert(declared.quantity, declared.uom, target)?;
            Ok(Measured::new(quantity, target))
        }
        _ => Ok(declared),
    }
}

fn log_outcome(ctx: &TransactionContext, result: &CoreResult<TaxBreakdown>) {
    match result {
        Ok(breakdown) => info!(
            event = "tax_lookup",
            hsn_code = %ctx.hsn_code,
            outcome = "success",
            supply_type = %breakdown.supply_type,
            total_tax = %breakdown.total_tax,
        ),
        Err(err) if err.is_rule_table_error() => error!(
            event = "tax_lookup",
            hsn_code = %ctx.hsn_code,
            outcome = "failure",
            error_kind = err.kind(),
            error = %err,
        ),
        Err(err) => warn!(
            event = "tax_lookup",
            hsn_code = %ctx.hsn_code,
            outcome = "failure",
            error_kind = err.kind(),
            error = %err,
        ),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
