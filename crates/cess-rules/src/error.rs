//! # Rule File Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  io::Error / serde_json::Error / CoreError (bad rule)                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  RulesError (this module) ← Adds the path or entry index               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  startup: process exits    reload: ApiError, old table stays live      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use thiserror::Error;

/// Rule file loading errors.
#[derive(Debug, Error)]
pub enum RulesError {
    /// The rule file could not be read.
    ///
    /// ## When This Occurs
    /// - Path doesn't exist
    /// - File permissions issue
    #[error("Failed to read rule file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or does not match the rule file shape.
    ///
    /// ## When This Occurs
    /// - Syntax error
    /// - Unknown `type` tag or field
    /// - Malformed HSN pattern, unit or state code
    #[error("Malformed rule file: {0}")]
    Parse(#[from] serde_json::Error),

    /// A cess entry parsed but does not describe a usable rule.
    ///
    /// ## When This Occurs
    /// - A field required by the entry's `type` is missing
    /// - Negative rate or non-positive `unit_count`
    /// - A per-unit rule with no `uom`
    #[error("Invalid cess rule #{index}: {reason}")]
    InvalidRule { index: usize, reason: String },
}

impl RulesError {
    pub fn invalid_rule(index: usize, reason: impl Into<String>) -> Self {
        RulesError::InvalidRule {
            index,
            reason: reason.into(),
        }
    }
}

/// Result type for rule file operations.
pub type RulesResult<T> = Result<T, RulesError>;
