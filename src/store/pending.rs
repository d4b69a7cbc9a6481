use std::sync::Arc;

use crate::models::PendingPayment;

use super::kv::KvStore;

const KEY_PREFIX: &str = "pendingPayment:";

/// Session-scoped order-token → {order id, amount} mapping, written right
/// before the provider redirect and read exactly once on return. Entries
/// for abandoned checkouts expire with the session.
#[derive(Clone)]
pub struct PendingPaymentStore {
    kv: Arc<dyn KvStore>,
}

impl PendingPaymentStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    fn key(order_token: &str) -> String {
        format!("{KEY_PREFIX}{order_token}")
    }

    /// Stores the mapping, stamped with the current time. Overwrites any
    /// prior entry for the token.
    pub fn set(&self, order_token: &str, order_id: i64, amount: i64) {
        let payload = PendingPayment {
            order_id,
            amount,
            created_at: chrono::Utc::now().timestamp_millis(),
        };
        match serde_json::to_string(&payload) {
            Ok(serialized) => self.kv.set(&Self::key(order_token), serialized),
            Err(err) => tracing::warn!(error = %err, "failed to serialize pending payment"),
        }
    }

    /// Returns the mapping, or `None` for missing or corrupt entries.
    pub fn get(&self, order_token: &str) -> Option<PendingPayment> {
        let raw = self.kv.get(&Self::key(order_token))?;
        serde_json::from_str(&raw).ok()
    }

    pub fn clear(&self, order_token: &str) {
        self.kv.remove(&Self::key(order_token));
    }
}
