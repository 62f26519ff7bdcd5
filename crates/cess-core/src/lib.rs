//! # cess-core: Pure Tax Logic for the Cess Engine
//!
//! Computes GST and compensation cess for one line item from its HSN code,
//! quantity, price and states of origin and destination. Everything here is
//! a pure function of the request and an injected rule table.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cess Engine Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cess-api (HTTP, axum)                        │   │
//! │  │        /api/taxes ──► TaxRequest ──► TransactionContext         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ cess-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │    uom    │  │   rules   │  │calculator │  │  lookup   │  │   │
//! │  │   │  convert  │  │  resolve  │  │  compute  │  │  facade   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO NETWORK • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │                 cess-rules (rule file layer)                    │   │
//! │  │          JSON rule file ──► RuleTable, reload by swap           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (HSN codes, states, context, breakdown)
//! - [`money`] - Rounded amounts in paise
//! - [`uom`] - Units of measure and conversion
//! - [`rules`] - Rule table and longest-prefix resolution
//! - [`calculator`] - GST and cess arithmetic
//! - [`lookup`] - The facade tying the above together
//! - [`currency`] - Currency conversion seam
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same context and table, same breakdown
//! 2. **No I/O**: the rule table is handed in, never read here
//! 3. **Decimal Math**: no binary floats anywhere in a computation
//! 4. **Explicit Errors**: every failure is a typed `CoreError`

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod currency;
pub mod error;
pub mod lookup;
pub mod money;
pub mod rules;
pub mod types;
pub mod uom;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, Schedule, ValidationError};
pub use lookup::LookupService;
pub use money::Money;
pub use rules::{CessRate, CessRule, GstSlab, RateKind, RuleConflict, RuleTable};
pub use types::*;
pub use uom::Uom;

/// Everything needed to build a table and run lookups.
pub mod prelude {
    pub use crate::currency::{CurrencyConverter, PassThrough};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::lookup::LookupService;
    pub use crate::money::Money;
    pub use crate::rules::{CessRate, CessRule, GstSlab, RuleTable};
    pub use crate::types::{
        CurrencyCode, HsnCode, HsnPattern, StateCode, SupplyCategory, SupplyType, TaxBreakdown,
        TaxRate, TransactionContext,
    };
    pub use crate::uom::Uom;
}
