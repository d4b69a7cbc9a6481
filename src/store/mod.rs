//! Client-side state, ported from the browser's storage model.
//!
//! Each store is the sole writer of its own key namespace over a shared
//! [`kv::KvStore`]. Cart and order history sit on the persistent backend
//! (the browser's localStorage), pending payments and the bulk-checkout
//! queue on the process-lifetime backend (sessionStorage). Every store
//! treats malformed data as absent; none of them is authoritative state.

pub mod bulk;
pub mod cart;
pub mod history;
pub mod kv;
pub mod pending;

pub use bulk::BulkCheckoutStore;
pub use cart::CartStore;
pub use history::OrderHistoryStore;
pub use kv::{FileStore, KvStore, MemoryStore};
pub use pending::PendingPaymentStore;

use std::sync::Arc;

use crate::config::AppConfig;

/// The full set of stores wired into the application state.
#[derive(Clone)]
pub struct Stores {
    pub cart: CartStore,
    pub pending: PendingPaymentStore,
    pub history: OrderHistoryStore,
    pub bulk: BulkCheckoutStore,
}

impl Stores {
    /// Production wiring: file-backed persistent stores, in-memory session
    /// stores.
    pub fn open(config: &AppConfig) -> anyhow::Result<Self> {
        let persistent: Arc<dyn KvStore> =
            Arc::new(FileStore::open(config.storage_dir.join("storefront.json"))?);
        let session: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        Ok(Self::new(persistent, session))
    }

    /// Both namespaces in memory; used by tests.
    pub fn in_memory() -> Self {
        let persistent: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        let session: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
        Self::new(persistent, session)
    }

    pub fn new(persistent: Arc<dyn KvStore>, session: Arc<dyn KvStore>) -> Self {
        Self {
            cart: CartStore::new(persistent.clone()),
            pending: PendingPaymentStore::new(session.clone()),
            history: OrderHistoryStore::new(persistent),
            bulk: BulkCheckoutStore::new(session),
        }
    }
}
