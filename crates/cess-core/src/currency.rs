//! Currency conversion seam.
//!
//! Every amount is computed in INR. A line priced in another currency has
//! its unit price converted first. No exchange-rate source ships with the
//! engine; [`PassThrough`] returns amounts unchanged and deployments that
//! need real rates supply their own [`CurrencyConverter`].

use rust_decimal::Decimal;

use crate::types::CurrencyCode;

/// Converts an amount between currencies.
///
/// Implementations must be pure with respect to a lookup: the same inputs
/// give the same output for the lifetime of the service.
pub trait CurrencyConverter: Send + Sync {
    fn convert_currency(&self, amount: Decimal, from: &CurrencyCode, to: &CurrencyCode) -> Decimal;
}

/// Identity converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl CurrencyConverter for PassThrough {
    fn convert_currency(&self, amount: Decimal, _from: &CurrencyCode, _to: &CurrencyCode) -> Decimal {
        amount
    }
}
