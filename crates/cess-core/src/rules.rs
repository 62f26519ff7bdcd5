//! # Rule Table and Resolver
//!
//! Cess rules and GST slabs keyed by HSN pattern, with deterministic
//! longest-prefix resolution.
//!
//! ## Resolution Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  resolve("24022010", destination = MH)                                  │
//! │                                                                         │
//! │  prefix "24022010" ──► bucket? ──► scoped to MH? ──► unscoped?          │
//! │  prefix "2402201"  ──► bucket? ──►     ...                              │
//! │  prefix "240220"   ──► bucket? ──►     ...                              │
//! │  prefix "2402"     ──► bucket ✓ ──► 1 unscoped rule ──► MATCH           │
//! │                                                                         │
//! │  Within a bucket:                                                       │
//! │    • inactive rules are never candidates                                │
//! │    • rules scoped to another state are never candidates                 │
//! │    • a rule scoped to the destination beats an unscoped rule            │
//! │    • two equally specific candidates ──► AmbiguousRule                  │
//! │                                                                         │
//! │  No bucket yields a candidate ──► RuleNotFound                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Buckets are keyed by the exact digit prefix, so resolution costs at most
//! one hash lookup per digit of the HSN code and never depends on insertion
//! order. The table is immutable once built; reloads replace it whole.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult, Schedule, ValidationError};
use crate::types::{HsnCode, HsnPattern, StateCode, TaxRate};
use crate::uom::Uom;
use crate::validation::{validate_non_negative, validate_positive, ValidationResult};

// =============================================================================
// Cess Rate
// =============================================================================

/// Whether a rate is a share of value or an amount per unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    AdValorem,
    Specific,
}

/// How a cess amount is derived.
///
/// Specific amounts are `amount` per `per` units of the rule's
/// `applicable_uom` (e.g. ₹4170 per 1000 sticks).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CessRate {
    /// Percentage of taxable value.
    AdValorem { percent: Decimal },
    /// Fixed amount per quantity.
    Specific { amount: Decimal, per: Decimal },
    /// Ad-valorem part plus specific part.
    Compound {
        percent: Decimal,
        amount: Decimal,
        per: Decimal,
    },
    /// The larger of the ad-valorem part and the specific part.
    HigherOf {
        percent: Decimal,
        amount: Decimal,
        per: Decimal,
    },
}

impl CessRate {
    /// `AdValorem` unless a per-unit component is involved.
    pub fn rate_kind(&self) -> RateKind {
        match self {
            CessRate::AdValorem { .. } => RateKind::AdValorem,
            _ => RateKind::Specific,
        }
    }

    /// Returns true when computing this rate needs a quantity in the
    /// rule's unit.
    pub fn needs_quantity(&self) -> bool {
        self.rate_kind() == RateKind::Specific
    }

    /// Checks every component. Percentages are not capped at 100:
    /// compensation cess on some goods exceeds the value itself.
    pub fn validate(&self) -> ValidationResult<()> {
        match *self {
            CessRate::AdValorem { percent } => validate_non_negative("cess_rate", percent),
            CessRate::Specific { amount, per } => validate_specific(amount, per),
            CessRate::Compound {
                percent,
                amount,
                per,
            }
            | CessRate::HigherOf {
                percent,
                amount,
                per,
            } => {
                validate_non_negative("cess_rate", percent)?;
                validate_specific(amount, per)
            }
        }
    }
}

fn validate_specific(amount: Decimal, per: Decimal) -> ValidationResult<()> {
    validate_non_negative("cess_amount", amount)?;
    validate_positive("unit_count", per)
}

// =============================================================================
// Rules
// =============================================================================

/// Shared shape of anything resolvable by HSN prefix.
pub trait PrefixRule {
    fn pattern(&self) -> &HsnPattern;

    /// State the rule is restricted to, if any.
    fn state(&self) -> Option<&StateCode> {
        None
    }

    fn is_active(&self) -> bool {
        true
    }
}

/// A compensation cess rule.
///
/// Constructed through [`CessRule::new`], which guarantees that a rule with
/// a per-unit component names the unit it is denominated in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CessRule {
    hsn_pattern: HsnPattern,
    rate: CessRate,
    applicable_uom: Option<Uom>,
    state: Option<StateCode>,
    active: bool,
}

impl CessRule {
    /// Creates an active, unscoped rule.
    ///
    /// ## Errors
    /// `InvalidInput` when a rate component is negative, `per` is not
    /// positive, or a specific rate has no `applicable_uom`.
    pub fn new(
        hsn_pattern: HsnPattern,
        rate: CessRate,
        applicable_uom: Option<Uom>,
    ) -> CoreResult<Self> {
        rate.validate()?;
        if rate.needs_quantity() && applicable_uom.is_none() {
            return Err(ValidationError::Required {
                field: "applicable_uom".to_string(),
            }
            .into());
        }

        Ok(CessRule {
            hsn_pattern,
            rate,
            applicable_uom,
            state: None,
            active: true,
        })
    }

    /// Shorthand for an ad-valorem rule.
    pub fn ad_valorem(hsn_pattern: HsnPattern, percent: Decimal) -> CoreResult<Self> {
        CessRule::new(hsn_pattern, CessRate::AdValorem { percent }, None)
    }

    /// Restricts the rule to supplies destined for `state`.
    pub fn scoped_to(mut self, state: StateCode) -> Self {
        self.state = Some(state);
        self
    }

    /// Sets the effective flag. Inactive rules never match.
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    pub fn hsn_pattern(&self) -> &HsnPattern {
        &self.hsn_pattern
    }

    pub fn rate(&self) -> &CessRate {
        &self.rate
    }

    pub fn rate_kind(&self) -> RateKind {
        self.rate.rate_kind()
    }

    /// Unit the specific component is denominated in.
    pub fn applicable_uom(&self) -> Option<Uom> {
        self.applicable_uom
    }

    pub fn state_scope(&self) -> Option<&StateCode> {
        self.state.as_ref()
    }

    pub fn active(&self) -> bool {
        self.active
    }
}

impl PrefixRule for CessRule {
    fn pattern(&self) -> &HsnPattern {
        &self.hsn_pattern
    }

    fn state(&self) -> Option<&StateCode> {
        self.state.as_ref()
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// A GST rate applying to every HSN code under a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GstSlab {
    pub hsn_pattern: HsnPattern,
    pub rate: TaxRate,
}

impl GstSlab {
    pub fn new(hsn_pattern: HsnPattern, rate: TaxRate) -> Self {
        GstSlab { hsn_pattern, rate }
    }
}

impl PrefixRule for GstSlab {
    fn pattern(&self) -> &HsnPattern {
        &self.hsn_pattern
    }
}

// =============================================================================
// Prefix Index
// =============================================================================

/// Rules bucketed by exact digit prefix.
#[derive(Debug, Clone)]
struct PrefixIndex<T> {
    schedule: Schedule,
    buckets: HashMap<String, Vec<T>>,
    len: usize,
}

impl<T: PrefixRule> PrefixIndex<T> {
    fn new(schedule: Schedule) -> Self {
        PrefixIndex {
            schedule,
            buckets: HashMap::new(),
            len: 0,
        }
    }

    fn insert(&mut self, rule: T) {
        self.buckets
            .entry(rule.pattern().as_str().to_string())
            .or_default()
            .push(rule);
        self.len += 1;
    }

    fn resolve(&self, hsn_code: &HsnCode, destination: Option<&StateCode>) -> CoreResult<&T> {
        let code = hsn_code.as_str();

        for len in (1..=code.len()).rev() {
            let Some(bucket) = self.buckets.get(&code[..len]) else {
                continue;
            };

            if let Some(state) = destination {
                let scoped = bucket
                    .iter()
                    .filter(|r| r.is_active() && r.state() == Some(state));
                if let Some(rule) = self.single(scoped, hsn_code, &code[..len])? {
                    return Ok(rule);
                }
            }

            let unscoped = bucket
                .iter()
                .filter(|r| r.is_active() && r.state().is_none());
            if let Some(rule) = self.single(unscoped, hsn_code, &code[..len])? {
                return Ok(rule);
            }
        }

        Err(CoreError::RuleNotFound {
            schedule: self.schedule,
            hsn_code: hsn_code.to_string(),
        })
    }

    /// Zero candidates: keep looking. One: the match. More: ambiguous.
    fn single<'a>(
        &self,
        mut candidates: impl Iterator<Item = &'a T>,
        hsn_code: &HsnCode,
        pattern: &str,
    ) -> CoreResult<Option<&'a T>> {
        let Some(first) = candidates.next() else {
            return Ok(None);
        };
        let extra = candidates.count();
        if extra > 0 {
            return Err(CoreError::AmbiguousRule {
                schedule: self.schedule,
                hsn_code: hsn_code.to_string(),
                pattern: pattern.to_string(),
                candidates: extra + 1,
            });
        }
        Ok(Some(first))
    }

    fn conflicts(&self) -> Vec<RuleConflict> {
        let mut conflicts = Vec::new();
        for (pattern, bucket) in &self.buckets {
            let mut by_scope: HashMap<Option<&StateCode>, usize> = HashMap::new();
            for rule in bucket.iter().filter(|r| r.is_active()) {
                *by_scope.entry(rule.state()).or_default() += 1;
            }
            for (state, count) in by_scope {
                if count > 1 {
                    conflicts.push(RuleConflict {
                        schedule: self.schedule,
                        pattern: pattern.clone(),
                        state: state.cloned(),
                        count,
                    });
                }
            }
        }
        conflicts
    }
}

/// A group of active rules that would make resolution ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleConflict {
    pub schedule: Schedule,
    pub pattern: String,
    pub state: Option<StateCode>,
    pub count: usize,
}

// =============================================================================
// Rule Table
// =============================================================================

/// The complete, read-only set of cess rules and GST slabs.
///
/// ## Lifecycle
/// ```text
/// rule file ──► cess-rules loader ──► RuleTable ──► Arc<RuleTable>
///                                                        │
///                                  shared by every lookup (no locking)
/// ```
#[derive(Debug, Clone)]
pub struct RuleTable {
    cess: PrefixIndex<CessRule>,
    gst: PrefixIndex<GstSlab>,
}

impl Default for RuleTable {
    fn default() -> Self {
        RuleTable::new()
    }
}

impl RuleTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        RuleTable {
            cess: PrefixIndex::new(Schedule::Cess),
            gst: PrefixIndex::new(Schedule::Gst),
        }
    }

    /// Builds a table from rule lists.
    pub fn from_rules(
        cess_rules: impl IntoIterator<Item = CessRule>,
        gst_slabs: impl IntoIterator<Item = GstSlab>,
    ) -> Self {
        let mut table = RuleTable::new();
        for rule in cess_rules {
            table.cess.insert(rule);
        }
        for slab in gst_slabs {
            table.gst.insert(slab);
        }
        table
    }

    /// Adds a cess rule (builder style, for construction only).
    pub fn with_cess_rule(mut self, rule: CessRule) -> Self {
        self.cess.insert(rule);
        self
    }

    /// Adds a GST slab (builder style, for construction only).
    pub fn with_gst_slab(mut self, slab: GstSlab) -> Self {
        self.gst.insert(slab);
        self
    }

    /// Resolves the single applicable cess rule.
    ///
    /// ## Example
    /// ```rust
    /// use cess_core::rules::{CessRule, RuleTable};
    /// use cess_core::types::{HsnCode, HsnPattern};
    /// use rust_decimal::Decimal;
    ///
    /// let table = RuleTable::new()
    ///     .with_cess_rule(CessRule::ad_valorem(HsnPattern::parse("1001").unwrap(), Decimal::ONE).unwrap())
    ///     .with_cess_rule(CessRule::ad_valorem(HsnPattern::parse("100110").unwrap(), Decimal::TWO).unwrap());
    ///
    /// let rule = table.resolve_cess(&HsnCode::parse("100110").unwrap(), None).unwrap();
    /// assert_eq!(rule.hsn_pattern().as_str(), "100110");
    ///
    /// let rule = table.resolve_cess(&HsnCode::parse("100199").unwrap(), None).unwrap();
    /// assert_eq!(rule.hsn_pattern().as_str(), "1001");
    /// ```
    pub fn resolve_cess(
        &self,
        hsn_code: &HsnCode,
        destination: Option<&StateCode>,
    ) -> CoreResult<&CessRule> {
        self.cess.resolve(hsn_code, destination)
    }

    /// Resolves the GST slab for an HSN code.
    pub fn resolve_gst(&self, hsn_code: &HsnCode) -> CoreResult<&GstSlab> {
        self.gst.resolve(hsn_code, None)
    }

    pub fn cess_rule_count(&self) -> usize {
        self.cess.len
    }

    pub fn gst_slab_count(&self) -> usize {
        self.gst.len
    }

    pub fn is_empty(&self) -> bool {
        self.cess.len == 0 && self.gst.len == 0
    }

    /// Every pattern/qualifier group that would resolve as ambiguous,
    /// sorted by schedule then pattern.
    pub fn conflicts(&self) -> Vec<RuleConflict> {
        let mut conflicts = self.cess.conflicts();
        conflicts.extend(self.gst.conflicts());
        conflicts.sort_by(|a, b| {
            (a.schedule == Schedule::Gst, &a.pattern, a.state.as_ref().map(StateCode::as_str))
                .cmp(&(
                    b.schedule == Schedule::Gst,
                    &b.pattern,
                    b.state.as_ref().map(StateCode::as_str),
                ))
        });
        conflicts
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
