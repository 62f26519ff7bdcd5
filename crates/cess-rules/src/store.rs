//! # Rule Store
//!
//! Holds the live rule table and replaces it atomically on reload.
//!
//! ## Snapshot Swap
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  current: RwLock<Arc<RuleSnapshot>>                                     │
//! │                                                                         │
//! │  lookup ──► read lock ──► clone Arc ──► unlock ──► use snapshot         │
//! │                                                                         │
//! │  reload ──► load + validate file (no lock held)                         │
//! │               │                                                         │
//! │               ├── error ──► return it, current snapshot untouched       │
//! │               │                                                         │
//! │               └── ok ──► write lock ──► replace Arc ──► unlock          │
//! │                                                                         │
//! │  In-flight lookups keep the snapshot they cloned. No one ever sees     │
//! │  a half-built table.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::info;

use cess_core::rules::RuleTable;

use crate::error::RulesResult;
use crate::loader::load_rule_table;

/// An immutable, loaded rule table with its provenance.
#[derive(Debug)]
pub struct RuleSnapshot {
    table: Arc<RuleTable>,
    source: PathBuf,
    loaded_at: DateTime<Utc>,
}

impl RuleSnapshot {
    pub fn new(table: RuleTable, source: impl Into<PathBuf>) -> Self {
        RuleSnapshot {
            table: Arc::new(table),
            source: source.into(),
            loaded_at: Utc::now(),
        }
    }

    /// The table, shareable with a `LookupService`.
    pub fn table(&self) -> &Arc<RuleTable> {
        &self.table
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// The live rule table for a process.
#[derive(Debug)]
pub struct RuleStore {
    path: PathBuf,
    current: RwLock<Arc<RuleSnapshot>>,
}

impl RuleStore {
    /// Loads the rule file at `path`.
    ///
    /// ## Errors
    /// Any [`RulesError`](crate::RulesError): a store never starts empty.
    pub fn open(path: impl Into<PathBuf>) -> RulesResult<Self> {
        let path = path.into();
        let table = load_rule_table(&path)?;
        Ok(RuleStore {
            current: RwLock::new(Arc::new(RuleSnapshot::new(table, path.clone()))),
            path,
        })
    }

    /// Wraps an already built table. `path` is used by later reloads.
    pub fn with_table(table: RuleTable, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        RuleStore {
            current: RwLock::new(Arc::new(RuleSnapshot::new(table, path.clone()))),
            path,
        }
    }

    /// The snapshot in effect right now.
    pub fn current(&self) -> Arc<RuleSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Re-reads the rule file and swaps it in.
    ///
    /// On error the previous snapshot stays in effect.
    pub fn reload(&self) -> RulesResult<Arc<RuleSnapshot>> {
        let table = load_rule_table(&self.path)?;
        let snapshot = Arc::new(RuleSnapshot::new(table, self.path.clone()));

        *self.current.write() = Arc::clone(&snapshot);

        info!(
            path = %self.path.display(),
            cess_rules = snapshot.table.cess_rule_count(),
            gst_slabs = snapshot.table.gst_slab_count(),
            "Rule table swapped in"
        );
        Ok(snapshot)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
