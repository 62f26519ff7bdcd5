//! # Error Types
//!
//! Domain-specific error types for cess-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  cess-core errors (this file)                                          │
//! │  ├── CoreError        - Terminal failures of a single lookup           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  cess-rules errors (separate crate)                                    │
//! │  └── RulesError       - Rule file load failures                        │
//! │                                                                         │
//! │  HTTP API errors (in app)                                              │
//! │  └── ApiError         - What API clients see (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Client                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (HSN code, unit, etc.)
//! 3. Errors are enum variants, never String
//! 4. None of these are retried: they mean bad input or a bad rule table

use std::fmt;

use thiserror::Error;

use crate::uom::Uom;

// =============================================================================
// Schedule
// =============================================================================

/// Which rule schedule a resolution failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Compensation cess rules.
    Cess,
    /// Companion GST rate slabs.
    Gst,
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Cess => write!(f, "cess"),
            Schedule::Gst => write!(f, "GST"),
        }
    }
}

// =============================================================================
// Core Error
// =============================================================================

/// Core tax computation errors.
///
/// Every variant is terminal for the current request. Components fail fast
/// and the error surfaces unchanged through the lookup facade.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Units are unknown to the conversion table or belong to different
    /// dimensions (mass vs volume, etc.).
    #[error("Cannot convert {from} to {to}")]
    UnsupportedConversion { from: Uom, to: Uom },

    /// No active rule pattern is a prefix of the HSN code.
    #[error("No {schedule} rule found for HSN {hsn_code}")]
    RuleNotFound { schedule: Schedule, hsn_code: String },

    /// Two or more rules tie on prefix length and qualifier specificity.
    ///
    /// ## When This Occurs
    /// ```text
    /// Rule table:  2402 (unscoped, 5%)
    ///              2402 (unscoped, 7%)
    ///      │
    ///      ▼
    /// resolve("24022010")
    ///      │
    ///      ▼
    /// AmbiguousRule { pattern: "2402", candidates: 2 }
    /// ```
    /// This is a misconfiguration of the rule table, never a silent pick.
    #[error("{candidates} {schedule} rules for pattern {pattern} match HSN {hsn_code} equally")]
    AmbiguousRule {
        schedule: Schedule,
        hsn_code: String,
        pattern: String,
        candidates: usize,
    },

    /// A specific-rate cess rule was applied to a quantity in another unit.
    #[error("Cess rule is denominated in {expected}, quantity is in {found}")]
    UnitMismatch { expected: Uom, found: Uom },

    /// Input failed validation (negative amounts, rate out of range, ...).
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ValidationError),
}

impl CoreError {
    /// Stable snake_case name of the error kind, used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::UnsupportedConversion { .. } => "unsupported_conversion",
            CoreError::RuleNotFound { .. } => "rule_not_found",
            CoreError::AmbiguousRule { .. } => "ambiguous_rule",
            CoreError::UnitMismatch { .. } => "unit_mismatch",
            CoreError::InvalidInput(_) => "invalid_input",
        }
    }

    /// Returns true when the failure points at the rule table rather than
    /// at the request.
    pub fn is_rule_table_error(&self) -> bool {
        matches!(
            self,
            CoreError::RuleNotFound { .. } | CoreError::AmbiguousRule { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when request or rule data doesn't meet requirements.
/// They are wrapped into [`CoreError::InvalidInput`].
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Invalid format (e.g., non-digit HSN code, unknown unit).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates a Negative error for a field.
    pub fn negative(field: impl Into<String>) -> Self {
        ValidationError::Negative {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
