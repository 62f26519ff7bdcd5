//! # Rule File Loader
//!
//! Reads and validates a rule file into a [`RuleTable`].
//!
//! ## Load Flow
//! ```text
//! path ──► read_to_string ──► serde_json ──► RuleFile
//!                                               │
//!                       every entry ──► CessRule / GstSlab (validated)
//!                                               │
//!                                               ▼
//!                                          RuleTable ──► conflicts() logged
//! ```
//!
//! Any failure rejects the whole file. There is no partial table.

use std::path::Path;

use tracing::{info, warn};

use cess_core::rules::{GstSlab, RuleTable};

use crate::error::{RulesError, RulesResult};
use crate::schema::RuleFile;

/// Parses rule file contents.
pub fn parse_rule_table(json: &str) -> RulesResult<RuleTable> {
    let file: RuleFile = serde_json::from_str(json)?;

    let cess = file
        .cess
        .into_iter()
        .enumerate()
        .map(|(index, entry)| entry.into_rule(index))
        .collect::<RulesResult<Vec<_>>>()?;
    let gst = file.gst.into_iter().map(GstSlab::from);

    Ok(RuleTable::from_rules(cess, gst))
}

/// Reads and parses the rule file at `path`.
///
/// Ambiguous rule groups do not fail the load (they only fail lookups that
/// hit them) but each one is logged.
pub fn load_rule_table(path: impl AsRef<Path>) -> RulesResult<RuleTable> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| RulesError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let table = parse_rule_table(&json)?;

    info!(
        path = %path.display(),
        cess_rules = table.cess_rule_count(),
        gst_slabs = table.gst_slab_count(),
        "Loaded rule table"
    );
    for conflict in table.conflicts() {
        warn!(
            path = %path.display(),
            schedule = %conflict.schedule,
            pattern = %conflict.pattern,
            state = conflict.state.as_ref().map(|s| s.as_str()).unwrap_or("-"),
            rules = conflict.count,
            "Ambiguous rule group"
        );
    }

    Ok(table)
}
