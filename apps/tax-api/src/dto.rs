//! Request and response bodies.
//!
//! Request fields arrive as plain strings and are validated into core types
//! here, so every bad value is reported as a `VALIDATION_ERROR` naming the
//! field.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use cess_core::types::{
    CurrencyCode, HsnCode, StateCode, SupplyCategory, TaxBreakdown, TaxRate, TransactionContext,
};
use cess_core::uom::Uom;
use cess_core::validation::ValidationResult;
use cess_core::Money;

// =============================================================================
// Tax Lookup
// =============================================================================

/// One line item to tax. Accepted as a JSON body or as query parameters.
///
/// Numbers may be sent as JSON numbers or strings (`"100.00"`).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRequest {
    pub hsn: String,

    #[ts(type = "string | number")]
    pub quantity: Decimal,

    /// Unit of the declared quantity (`kg`, `litre`, `piece`, UQC codes...)
    pub uom: String,

    /// Price per declared unit
    #[ts(type = "string | number")]
    pub unit_price: Decimal,

    pub origin_state: String,

    pub destination_state: String,

    /// GST rate in percent; resolved from the rule table when absent
    #[serde(default)]
    #[ts(type = "string | number | null")]
    pub gst_rate: Option<Decimal>,

    /// Currency of `unit_price`, default INR
    #[serde(default)]
    pub currency: Option<String>,

    /// `default` or `custom`
    #[serde(default)]
    pub category: Option<String>,
}

impl TaxRequest {
    /// Validates every field into a transaction context.
    pub fn into_context(self) -> ValidationResult<TransactionContext> {
        let mut ctx = TransactionContext::new(
            HsnCode::parse(self.hsn)?,
            self.quantity,
            self.uom.parse::<Uom>()?,
            self.unit_price,
            StateCode::parse(&self.origin_state)?,
            StateCode::parse(&self.destination_state)?,
        );

        if let Some(rate) = self.gst_rate {
            ctx = ctx.with_gst_rate(TaxRate::from_percent(rate)?);
        }
        if let Some(currency) = self.currency.as_deref().filter(|c| !c.trim().is_empty()) {
            ctx = ctx.with_currency(CurrencyCode::parse(currency)?);
        }
        if let Some(category) = self.category.as_deref() {
            ctx = ctx.with_category(category.parse::<SupplyCategory>()?);
        }

        Ok(ctx)
    }
}

/// The computed taxes. Amounts are rupees with exactly two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxResponse {
    pub hsn: String,
    pub category: String,
    pub supply_type: String,
    pub taxable_value: String,
    pub cgst: String,
    pub sgst: String,
    pub igst: String,
    pub cess: String,
    pub total_tax: String,
    pub total_amount: String,
}

impl TaxResponse {
    pub fn new(ctx: &TransactionContext, breakdown: &TaxBreakdown) -> Self {
        TaxResponse {
            hsn: ctx.hsn_code.to_string(),
            category: ctx.category.to_string(),
            supply_type: breakdown.supply_type.to_string(),
            taxable_value: amount(breakdown.taxable_value),
            cgst: amount(breakdown.cgst_amount),
            sgst: amount(breakdown.sgst_amount),
            igst: amount(breakdown.igst_amount),
            cess: amount(breakdown.cess_amount),
            total_tax: amount(breakdown.total_tax),
            total_amount: amount(breakdown.total_amount),
        }
    }
}

fn amount(money: Money) -> String {
    money.to_decimal().to_string()
}

// =============================================================================
// Rules and Health
// =============================================================================

/// Counts and load time of the rule table in effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RulesStatus {
    pub cess_rules: u32,
    pub gst_slabs: u32,
    /// RFC 3339 timestamp
    pub loaded_at: String,
}

impl RulesStatus {
    pub fn from_snapshot(snapshot: &cess_rules::RuleSnapshot) -> Self {
        let table = snapshot.table();
        RulesStatus {
            cess_rules: u32::try_from(table.cess_rule_count()).unwrap_or(u32::MAX),
            gst_slabs: u32::try_from(table.gst_slab_count()).unwrap_or(u32::MAX),
            loaded_at: snapshot.loaded_at().to_rfc3339(),
        }
    }
}

/// `GET /health` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct HealthResponse {
    pub status: String,
    pub rules: RulesStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use cess_core::types::SupplyType;

    fn request() -> TaxRequest {
        serde_json::from_str(
            r#"{
                "hsn": "2402",
                "quantity": 10,
                "uom": "piece",
                "unit_price": "100.00",
                "origin_state": "MH",
                "destination_state": "MH",
                "gst_rate": 28
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_request_into_context() {
        let ctx = request().into_context().unwrap();
        assert_eq!(ctx.hsn_code.as_str(), "2402");
        assert_eq!(ctx.unit_of_measure, Uom::Piece);
        assert_eq!(ctx.gst_rate.map(|r| r.percent()), Some(Decimal::from(28)));
        assert_eq!(ctx.currency, CurrencyCode::inr());
        assert_eq!(ctx.category, SupplyCategory::Default);
    }

    #[test]
    fn test_request_validation_names_field() {
        let mut req = request();
        req.uom = "bushel".to_string();
        let err = req.into_context().unwrap_err();
        assert!(err.to_string().contains("unit_of_measure"));

        let mut req = request();
        req.destination_state = "Maharashtra".to_string();
        assert!(req.into_context().is_err());

        let mut req = request();
        req.gst_rate = Some(Decimal::from(150));
        assert!(req.into_context().is_err());

        let mut req = request();
        req.category = Some("Custom".to_string());
        assert_eq!(req.into_context().unwrap().category, SupplyCategory::Custom);
    }

    #[test]
    fn test_response_formats_two_decimals() {
        let ctx = request().into_context().unwrap();
        let breakdown = TaxBreakdown {
            supply_type: SupplyType::IntraState,
            taxable_value: Money::from_rupees(1000),
            cess_amount: Money::from_rupees(50),
            cgst_amount: Money::from_rupees(140),
            sgst_amount: Money::from_rupees(140),
            igst_amount: Money::zero(),
            total_tax: Money::from_rupees(330),
            total_amount: Money::from_rupees(1330),
        };
        let response = TaxResponse::new(&ctx, &breakdown);
        assert_eq!(response.taxable_value, "1000.00");
        assert_eq!(response.igst, "0.00");
        assert_eq!(response.total_amount, "1330.00");
        assert_eq!(response.supply_type, "intra_state");
        assert_eq!(response.category, "default");
    }
}
