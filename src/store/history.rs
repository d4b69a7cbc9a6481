use std::sync::Arc;

use serde_json::Value;

use crate::extract;

use super::kv::KvStore;

const ORDER_HISTORY_KEY: &str = "pentagon_order_history_v1";

/// Local index of internal order ids this client has created, most recent
/// first. The backend has no "list my orders" endpoint, so the orders view
/// re-fetches each id individually. Ids are never removed one by one, only
/// cleared in bulk.
#[derive(Clone)]
pub struct OrderHistoryStore {
    kv: Arc<dyn KvStore>,
}

impl OrderHistoryStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Deduplicated positive ids; corrupt data reads as empty.
    pub fn load(&self) -> Vec<i64> {
        let Some(raw) = self.kv.get(ORDER_HISTORY_KEY) else {
            return Vec::new();
        };
        let Ok(values) = serde_json::from_str::<Vec<Value>>(&raw) else {
            return Vec::new();
        };

        let mut ids = Vec::new();
        for id in values.iter().filter_map(extract::pick_i64) {
            if id > 0 && !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    fn save(&self, ids: &[i64]) {
        match serde_json::to_string(ids) {
            Ok(serialized) => self.kv.set(ORDER_HISTORY_KEY, serialized),
            Err(err) => tracing::warn!(error = %err, "failed to serialize order history"),
        }
    }

    /// Prepends the id if it is not already recorded.
    pub fn add(&self, order_id: i64) -> Vec<i64> {
        let mut ids = self.load();
        if !ids.contains(&order_id) {
            ids.insert(0, order_id);
            self.save(&ids);
        }
        ids
    }

    pub fn clear(&self) {
        self.kv.remove(ORDER_HISTORY_KEY);
    }
}
