//! Shared application state.

use std::sync::Arc;

use cess_core::currency::{CurrencyConverter, PassThrough};
use cess_core::LookupService;
use cess_rules::RuleStore;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<RuleStore>,
    pub currency: Arc<dyn CurrencyConverter>,
    pub allow_reload: bool,
}

impl AppState {
    pub fn new(rules: RuleStore, allow_reload: bool) -> Self {
        AppState {
            rules: Arc::new(rules),
            currency: Arc::new(PassThrough),
            allow_reload,
        }
    }

    /// A lookup service over the rule table in effect right now.
    ///
    /// The service keeps that table alive for as long as it is used, even
    /// if a reload swaps in a new one meanwhile.
    pub fn lookup_service(&self) -> LookupService {
        let snapshot = self.rules.current();
        LookupService::new(Arc::clone(snapshot.table())).with_currency(Arc::clone(&self.currency))
    }
}
