//! # Domain Types
//!
//! Core domain types used throughout the Cess Engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ TransactionCtx  │   │  TaxBreakdown   │   │    TaxRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  hsn_code       │   │  taxable_value  │   │  percent        │       │
//! │  │  quantity + uom │──►│  cgst/sgst/igst │   │  0..=100        │       │
//! │  │  unit_price     │   │  cess           │   └─────────────────┘       │
//! │  │  origin / dest  │   │  total_tax      │                             │
//! │  └─────────────────┘   │  total_amount   │   ┌─────────────────┐       │
//! │                        └─────────────────┘   │   SupplyType    │       │
//! │  Validated newtypes:                         │  ─────────────  │       │
//! │  HsnCode, HsnPattern, StateCode,             │  IntraState     │       │
//! │  CurrencyCode                                │  InterState     │       │
//! │                                              └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every validated newtype deserializes through `TryFrom<String>`, so an
//! invalid HSN code or state can never be constructed from JSON either.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::uom::Uom;
use crate::validation::{
    validate_currency_code, validate_hsn_code, validate_hsn_pattern, validate_percentage,
    validate_state_code, ValidationResult,
};

// =============================================================================
// HSN Code
// =============================================================================

/// An HSN code on a line item: 4 to 8 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HsnCode(String);

impl HsnCode {
    /// Parses and validates an HSN code.
    pub fn parse(code: impl Into<String>) -> ValidationResult<Self> {
        let code = code.into().trim().to_string();
        validate_hsn_code(&code)?;
        Ok(HsnCode(code))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HsnCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HsnCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HsnCode::parse(s)
    }
}

impl TryFrom<String> for HsnCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HsnCode::parse(value)
    }
}

impl From<HsnCode> for String {
    fn from(code: HsnCode) -> Self {
        code.0
    }
}

// =============================================================================
// HSN Pattern
// =============================================================================

/// A rule's HSN pattern: a digit prefix matched against HSN codes.
///
/// `"1001"` matches `"1001"`, `"100110"` and `"10019920"`. A trailing `*`
/// in the source text is accepted and dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HsnPattern(String);

impl HsnPattern {
    /// Parses and validates a rule pattern.
    pub fn parse(pattern: impl AsRef<str>) -> ValidationResult<Self> {
        let digits = validate_hsn_pattern(pattern.as_ref())?;
        Ok(HsnPattern(digits.to_string()))
    }

    /// Returns the digit prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HsnPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for HsnPattern {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HsnPattern::parse(s)
    }
}

impl TryFrom<String> for HsnPattern {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        HsnPattern::parse(value)
    }
}

impl From<HsnPattern> for String {
    fn from(pattern: HsnPattern) -> Self {
        pattern.0
    }
}

// =============================================================================
// State Code
// =============================================================================

/// A two-character state code, normalized to upper case (`MH`, `DL`, `27`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StateCode(String);

impl StateCode {
    /// Parses and validates a state code.
    pub fn parse(code: impl AsRef<str>) -> ValidationResult<Self> {
        let code = code.as_ref().trim().to_ascii_uppercase();
        validate_state_code(&code)?;
        Ok(StateCode(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for StateCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StateCode::parse(s)
    }
}

impl TryFrom<String> for StateCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        StateCode::parse(value)
    }
}

impl From<StateCode> for String {
    fn from(code: StateCode) -> Self {
        code.0
    }
}

// =============================================================================
// Currency Code
// =============================================================================

/// A three-letter currency code, normalized to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses and validates a currency code.
    pub fn parse(code: impl AsRef<str>) -> ValidationResult<Self> {
        let code = code.as_ref().trim().to_ascii_uppercase();
        validate_currency_code(&code)?;
        Ok(CurrencyCode(code))
    }

    /// Indian rupee, the currency every amount is computed in.
    pub fn inr() -> Self {
        CurrencyCode("INR".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode::inr()
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CurrencyCode::parse(value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// A GST rate as a percentage in [0, 100].
///
/// ## Why a Percentage, Not Basis Points?
/// Slabs like 0.25% and 1.5% exist, and compensation cess is quoted as a
/// percentage next to them. `Decimal` keeps all of these exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Creates a rate from a percentage, rejecting values outside [0, 100].
    pub fn from_percent(pct: Decimal) -> ValidationResult<Self> {
        validate_percentage("gst_rate", pct)?;
        Ok(TaxRate(pct))
    }

    /// Returns the rate as a percentage.
    #[inline]
    pub fn percent(&self) -> Decimal {
        self.0
    }

    /// Zero tax rate (nil-rated goods).
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl TryFrom<Decimal> for TaxRate {
    type Error = ValidationError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        TaxRate::from_percent(value)
    }
}

impl From<TaxRate> for Decimal {
    fn from(rate: TaxRate) -> Self {
        rate.0
    }
}

// =============================================================================
// Supply Type
// =============================================================================

/// Whether a supply stays within one state or crosses a state border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyType {
    /// Origin == destination: GST splits into CGST + SGST.
    IntraState,
    /// Origin != destination: GST is charged wholly as IGST.
    InterState,
}

impl SupplyType {
    /// Determines the supply type from origin and destination states.
    pub fn between(origin: &StateCode, destination: &StateCode) -> Self {
        if origin == destination {
            SupplyType::IntraState
        } else {
            SupplyType::InterState
        }
    }

    #[inline]
    pub fn is_intra_state(&self) -> bool {
        matches!(self, SupplyType::IntraState)
    }
}

impl fmt::Display for SupplyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplyType::IntraState => write!(f, "intra_state"),
            SupplyType::InterState => write!(f, "inter_state"),
        }
    }
}

// =============================================================================
// Supply Category
// =============================================================================

/// How cess is determined for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplyCategory {
    /// Cess is resolved from the rule table.
    #[default]
    Default,
    /// Cess is handled outside the engine; no cess rule is applied.
    Custom,
}

impl SupplyCategory {
    /// Returns true when the rule table decides the cess for this line.
    pub fn applies_auto_cess(&self) -> bool {
        matches!(self, SupplyCategory::Default)
    }
}

impl fmt::Display for SupplyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SupplyCategory::Default => write!(f, "default"),
            SupplyCategory::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for SupplyCategory {
    type Err = ValidationError;

    /// Case-insensitive; an empty string is the default category.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(SupplyCategory::Default),
            "custom" => Ok(SupplyCategory::Custom),
            other => Err(ValidationError::invalid_format(
                "category",
                format!("unknown category '{}'", other),
            )),
        }
    }
}

// =============================================================================
// Measured Quantity
// =============================================================================

/// A quantity together with the unit it is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measured {
    pub quantity: Decimal,
    pub uom: Uom,
}

impl Measured {
    pub fn new(quantity: Decimal, uom: Uom) -> Self {
        Measured { quantity, uom }
    }
}

// =============================================================================
// Transaction Context
// =============================================================================

/// Everything the engine needs to tax one line item. Immutable per request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionContext {
    pub hsn_code: HsnCode,

    /// Declared quantity, in `unit_of_measure`.
    pub quantity: Decimal,

    pub unit_of_measure: Uom,

    /// Price per declared unit, in `currency`.
    pub unit_price: Decimal,

    pub origin_state: StateCode,

    pub destination_state: StateCode,

    /// Explicit GST rate. When absent, the rule table's GST schedule decides.
    #[serde(default)]
    pub gst_rate: Option<TaxRate>,

    #[serde(default)]
    pub currency: CurrencyCode,

    #[serde(default)]
    pub category: SupplyCategory,
}

impl TransactionContext {
    /// Creates a context in INR, default category, GST rate from the table.
    pub fn new(
        hsn_code: HsnCode,
        quantity: Decimal,
        unit_of_measure: Uom,
        unit_price: Decimal,
        origin_state: StateCode,
        destination_state: StateCode,
    ) -> Self {
        TransactionContext {
            hsn_code,
            quantity,
            unit_of_measure,
            unit_price,
            origin_state,
            destination_state,
            gst_rate: None,
            currency: CurrencyCode::inr(),
            category: SupplyCategory::Default,
        }
    }

    /// Sets an explicit GST rate.
    pub fn with_gst_rate(mut self, rate: TaxRate) -> Self {
        self.gst_rate = Some(rate);
        self
    }

    /// Sets the currency the unit price is quoted in.
    pub fn with_currency(mut self, currency: CurrencyCode) -> Self {
        self.currency = currency;
        self
    }

    /// Sets the supply category.
    pub fn with_category(mut self, category: SupplyCategory) -> Self {
        self.category = category;
        self
    }

    /// Intra- or inter-state, from origin and destination.
    pub fn supply_type(&self) -> SupplyType {
        SupplyType::between(&self.origin_state, &self.destination_state)
    }

    /// The declared quantity with its unit.
    pub fn measured(&self) -> Measured {
        Measured::new(self.quantity, self.unit_of_measure)
    }
}

// =============================================================================
// Tax Breakdown
// =============================================================================

/// The computed taxes for one line. Request-scoped, never persisted.
///
/// ## Invariants
/// - Intra-state: `cgst_amount == sgst_amount`, `igst_amount == 0`
/// - Inter-state: `cgst_amount == sgst_amount == 0`
/// - Every amount was rounded once, from its own unrounded value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub supply_type: SupplyType,
    pub taxable_value: Money,
    pub cess_amount: Money,
    pub cgst_amount: Money,
    pub sgst_amount: Money,
    pub igst_amount: Money,
    pub total_tax: Money,
    pub total_amount: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
