//! # cess-rules: Rule Table Layer for the Cess Engine
//!
//! Loads the JSON rule file into a `cess_core::RuleTable` and keeps the live
//! table swappable at runtime.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cess Engine Data Flow                            │
//! │                                                                         │
//! │  cess_rules.json                                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   cess-rules (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    schema     │    │    loader     │    │    store     │  │   │
//! │  │   │ RuleFile      │───►│ parse / load  │───►│ RuleStore    │  │   │
//! │  │   │ entry types   │    │ log conflicts │    │ reload swap  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<RuleTable> ──► cess_core::LookupService                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cess_rules::RuleStore;
//!
//! let store = RuleStore::open("cess_rules.json")?;
//! let table = store.current().table().clone();
//! # Ok::<(), cess_rules::RulesError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod loader;
pub mod schema;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{RulesError, RulesResult};
pub use loader::{load_rule_table, parse_rule_table};
pub use schema::{CessRuleEntry, EntryType, GstSlabEntry, RuleFile};
pub use store::{RuleSnapshot, RuleStore};
