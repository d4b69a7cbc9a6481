use std::sync::Arc;

use crate::models::{BulkItem, BulkQueue};

use super::kv::KvStore;

const BULK_CHECKOUT_KEY: &str = "pentagon_bulk_checkout_v1";

/// Session-scoped queue driving the "order everything" flow: a list of
/// {product, quantity} pairs plus the index of the item currently being
/// paid. Each item is checked out as an independent single-item order; a
/// completed payment advances the index.
#[derive(Clone)]
pub struct BulkCheckoutStore {
    kv: Arc<dyn KvStore>,
}

impl BulkCheckoutStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Queue as stored, index clamped into range. Corrupt or empty payloads
    /// read as no queue.
    pub fn load(&self) -> Option<BulkQueue> {
        let raw = self.kv.get(BULK_CHECKOUT_KEY)?;
        let mut queue: BulkQueue = serde_json::from_str(&raw).ok()?;
        if queue.items.is_empty() {
            return None;
        }
        queue.index = queue.index.min(queue.items.len() - 1);
        Some(queue)
    }

    fn save(&self, queue: &BulkQueue) {
        match serde_json::to_string(queue) {
            Ok(serialized) => self.kv.set(BULK_CHECKOUT_KEY, serialized),
            Err(err) => tracing::warn!(error = %err, "failed to serialize bulk checkout queue"),
        }
    }

    /// Replaces the queue, restarting from the first item.
    pub fn set(&self, items: Vec<BulkItem>) {
        if items.is_empty() {
            self.clear();
            return;
        }
        self.save(&BulkQueue { index: 0, items });
    }

    /// The item whose checkout is currently in progress.
    pub fn current(&self) -> Option<BulkItem> {
        let queue = self.load()?;
        queue.items.get(queue.index).cloned()
    }

    /// Moves past the current item after its payment completed. Returns the
    /// next item to check out, clearing the queue when exhausted.
    pub fn advance(&self) -> Option<BulkItem> {
        let mut queue = self.load()?;
        queue.index += 1;
        match queue.items.get(queue.index).cloned() {
            Some(next) => {
                self.save(&queue);
                Some(next)
            }
            None => {
                self.clear();
                None
            }
        }
    }

    pub fn clear(&self) {
        self.kv.remove(BULK_CHECKOUT_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;
    use crate::store::kv::MemoryStore;

    fn item(id: i64) -> BulkItem {
        BulkItem {
            product: Product {
                product_id: id,
                name: format!("product-{id}"),
                description: None,
                price: 1000,
                stock: None,
                product_image_url: None,
            },
            quantity: 1,
        }
    }

    fn store() -> BulkCheckoutStore {
        BulkCheckoutStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn advance_walks_the_queue_then_clears() {
        let bulk = store();
        bulk.set(vec![item(1), item(2)]);

        assert_eq!(bulk.current().unwrap().product.product_id, 1);

        let next = bulk.advance().unwrap();
        assert_eq!(next.product.product_id, 2);
        assert_eq!(bulk.current().unwrap().product.product_id, 2);

        assert!(bulk.advance().is_none());
        assert!(bulk.load().is_none());
    }

    #[test]
    fn empty_or_corrupt_queue_reads_as_none() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(BULK_CHECKOUT_KEY, "nope".into());
        let bulk = BulkCheckoutStore::new(kv.clone());
        assert!(bulk.load().is_none());

        kv.set(BULK_CHECKOUT_KEY, r#"{"index":0,"items":[]}"#.into());
        assert!(bulk.load().is_none());
    }

    #[test]
    fn out_of_range_index_is_clamped() {
        let kv = Arc::new(MemoryStore::new());
        let bulk = BulkCheckoutStore::new(kv.clone());
        bulk.set(vec![item(1)]);

        // Simulate a stale index left over from an older queue.
        let mut queue = bulk.load().unwrap();
        queue.index = 9;
        kv.set(BULK_CHECKOUT_KEY, serde_json::to_string(&queue).unwrap());

        assert_eq!(bulk.load().unwrap().index, 0);
    }
}
