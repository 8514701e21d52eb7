//! Shared handler state.

use pioswap_data::LedgerStore;
use pioswap_ledger::{Ledger, LedgerConfig};
use std::sync::Arc;

/// State cloned into every handler.
#[derive(Clone)]
pub struct AppState {
    pub ledger: Ledger,
}

impl AppState {
    pub fn new(ledger: Ledger) -> Self {
        Self { ledger }
    }

    /// Builds a ledger over `store` and wraps it.
    pub fn with_store(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Self {
        Self::new(Ledger::new(store, config))
    }
}
