//! # Rule File Format
//!
//! ```json
//! {
//!   "cess": [
//!     { "hsn": "2402",     "type": "ad_valorem",     "rate_percent": "5" },
//!     { "hsn": "2701",     "type": "per_weight",     "rate_per_tonne": "400" },
//!     { "hsn": "24022010", "type": "combined",       "rate_percent": "5",
//!       "fixed_rate": "1591", "unit_count": "1000", "uom": "piece" },
//!     { "hsn": "2202",     "type": "ad_valorem",     "rate_percent": "15",
//!       "state": "KA", "active": false }
//!   ],
//!   "gst": [
//!     { "hsn": "24", "rate": "28" }
//!   ]
//! }
//! ```
//!
//! ## Entry Types
//! ```text
//! ┌──────────────────┬───────────────────────────────────┬──────────────────┐
//! │ type             │ fields                            │ becomes          │
//! ├──────────────────┼───────────────────────────────────┼──────────────────┤
//! │ ad_valorem       │ rate_percent                      │ AdValorem        │
//! │ fixed_per_unit   │ fixed_rate, unit_count?, uom      │ Specific         │
//! │ per_weight       │ rate_per_tonne                    │ Specific / tonne │
//! │ combined         │ rate_percent, fixed_rate,         │ Compound         │
//! │                  │ unit_count?, uom                  │                  │
//! │ higher_of        │ rate_percent, fixed_rate,         │ HigherOf         │
//! │                  │ unit_count?, uom                  │                  │
//! └──────────────────┴───────────────────────────────────┴──────────────────┘
//! ```
//! `unit_count` defaults to 1. Numbers may be written as JSON numbers or as
//! strings; strings are read exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use cess_core::rules::{CessRate, CessRule, GstSlab};
use cess_core::types::{HsnPattern, StateCode, TaxRate};
use cess_core::uom::Uom;

use crate::error::{RulesError, RulesResult};

/// The whole rule file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleFile {
    #[serde(default)]
    pub cess: Vec<CessRuleEntry>,
    #[serde(default)]
    pub gst: Vec<GstSlabEntry>,
}

/// How a cess entry is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryType {
    AdValorem,
    FixedPerUnit,
    PerWeight,
    Combined,
    HigherOf,
}

impl EntryType {
    fn as_str(&self) -> &'static str {
        match self {
            EntryType::AdValorem => "ad_valorem",
            EntryType::FixedPerUnit => "fixed_per_unit",
            EntryType::PerWeight => "per_weight",
            EntryType::Combined => "combined",
            EntryType::HigherOf => "higher_of",
        }
    }
}

/// One cess entry as written in the file.
///
/// Fields not used by the entry's `type` are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CessRuleEntry {
    pub hsn: HsnPattern,

    #[serde(rename = "type")]
    pub entry_type: EntryType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_percent: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_rate: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_count: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_per_tonne: Option<Decimal>,

    /// Unit the per-unit component is denominated in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uom: Option<Uom>,

    /// Destination state the rule is restricted to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<StateCode>,

    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl CessRuleEntry {
    /// Converts the entry at position `index` into a validated rule.
    pub fn into_rule(self, index: usize) -> RulesResult<CessRule> {
        let require = |value: Option<Decimal>, field: &str| {
            value.ok_or_else(|| {
                RulesError::invalid_rule(
                    index,
                    format!("{} entry needs {}", self.entry_type.as_str(), field),
                )
            })
        };
        let per = self.unit_count.unwrap_or(Decimal::ONE);

        let (rate, uom) = match self.entry_type {
            EntryType::AdValorem => (
                CessRate::AdValorem {
                    percent: require(self.rate_percent, "rate_percent")?,
                },
                self.uom,
            ),
            EntryType::FixedPerUnit => (
                CessRate::Specific {
                    amount: require(self.fixed_rate, "fixed_rate")?,
                    per,
                },
                self.uom,
            ),
            EntryType::PerWeight => {
                if let Some(uom) = self.uom.filter(|u| *u != Uom::Tonne) {
                    return Err(RulesError::invalid_rule(
                        index,
                        format!("per_weight entries are per tonne, not {}", uom),
                    ));
                }
                (
                    CessRate::Specific {
                        amount: require(self.rate_per_tonne, "rate_per_tonne")?,
                        per: Decimal::ONE,
                    },
                    Some(Uom::Tonne),
                )
            }
            EntryType::Combined => (
                CessRate::Compound {
                    percent: require(self.rate_percent, "rate_percent")?,
                    amount: require(self.fixed_rate, "fixed_rate")?,
                    per,
                },
                self.uom,
            ),
            EntryType::HigherOf => (
                CessRate::HigherOf {
                    percent: require(self.rate_percent, "rate_percent")?,
                    amount: require(self.fixed_rate, "fixed_rate")?,
                    per,
                },
                self.uom,
            ),
        };

        let mut rule = CessRule::new(self.hsn, rate, uom)
            .map_err(|e| RulesError::invalid_rule(index, e.to_string()))?
            .with_active(self.active);
        if let Some(state) = self.state {
            rule = rule.scoped_to(state);
        }
        Ok(rule)
    }
}

/// One GST slab as written in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GstSlabEntry {
    pub hsn: HsnPattern,
    pub rate: TaxRate,
}

impl From<GstSlabEntry> for GstSlab {
    fn from(entry: GstSlabEntry) -> Self {
        GstSlab::new(entry.hsn, entry.rate)
    }
}
