use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::backend::CommerceBackend;
use crate::config::AppConfig;
use crate::provider::PaymentProvider;
use crate::store::Stores;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub backend: Arc<dyn CommerceBackend>,
    pub provider: Arc<dyn PaymentProvider>,
    pub stores: Stores,
    /// Order tokens with a confirmation currently in flight. Guards against
    /// the same callback firing twice concurrently; sequential re-runs
    /// (page reloads) are handled by idempotent reconciliation instead.
    pub confirming: Arc<Mutex<HashSet<String>>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        backend: Arc<dyn CommerceBackend>,
        provider: Arc<dyn PaymentProvider>,
        stores: Stores,
    ) -> Self {
        Self {
            config: Arc::new(config),
            backend,
            provider,
            stores,
            confirming: Arc::new(Mutex::new(HashSet::new())),
        }
    }
}
