use std::sync::Arc;

use serde_json::Value;

use crate::extract;
use crate::models::{CartItem, Product};

use super::kv::KvStore;

const CART_KEY: &str = "pentagon_cart_v1";

/// Shopping cart, one entry per product id, insertion order preserved.
#[derive(Clone)]
pub struct CartStore {
    kv: Arc<dyn KvStore>,
}

impl CartStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Loads the cart. Corrupt data reads as an empty cart; entries missing
    /// a product id or quantity are dropped, quantities are clamped to 1.
    pub fn load(&self) -> Vec<CartItem> {
        let Some(raw) = self.kv.get(CART_KEY) else {
            return Vec::new();
        };
        let Ok(values) = serde_json::from_str::<Vec<Value>>(&raw) else {
            return Vec::new();
        };
        values.iter().filter_map(item_from_value).collect()
    }

    fn save(&self, items: &[CartItem]) {
        match serde_json::to_string(items) {
            Ok(serialized) => self.kv.set(CART_KEY, serialized),
            Err(err) => tracing::warn!(error = %err, "failed to serialize cart"),
        }
    }

    /// Adds `quantity` of `product`. If the product is already in the cart
    /// its quantity is increased and the stored snapshot refreshed from the
    /// latest product metadata; otherwise a new entry is appended.
    pub fn add(&self, product: Product, quantity: i64) -> Vec<CartItem> {
        let mut items = self.load();
        let quantity = quantity.max(1);

        match items.iter_mut().find(|it| it.product.product_id == product.product_id) {
            Some(existing) => {
                existing.quantity += quantity;
                existing.product = product;
            }
            None => items.push(CartItem { product, quantity }),
        }

        self.save(&items);
        items
    }

    /// Sets the quantity for a product; zero or negative removes it.
    pub fn update_quantity(&self, product_id: i64, quantity: i64) -> Vec<CartItem> {
        let mut items = self.load();
        if quantity <= 0 {
            items.retain(|it| it.product.product_id != product_id);
        } else if let Some(item) = items.iter_mut().find(|it| it.product.product_id == product_id) {
            item.quantity = quantity.max(1);
        }
        self.save(&items);
        items
    }

    pub fn remove(&self, product_id: i64) -> Vec<CartItem> {
        let mut items = self.load();
        items.retain(|it| it.product.product_id != product_id);
        self.save(&items);
        items
    }

    pub fn clear(&self) {
        self.kv.remove(CART_KEY);
    }
}

/// Sum of unit price x quantity across the cart. Pure.
pub fn total(items: &[CartItem]) -> i64 {
    items.iter().map(|it| it.product.price * it.quantity).sum()
}

fn item_from_value(value: &Value) -> Option<CartItem> {
    let product_id = value.get("productId").and_then(extract::pick_i64)?;
    let quantity = value.get("quantity").and_then(extract::pick_i64)?;
    Some(CartItem {
        product: Product {
            product_id,
            name: value
                .get("name")
                .and_then(extract::pick_string)
                .unwrap_or_default(),
            description: value.get("description").and_then(extract::pick_string),
            price: value.get("price").and_then(extract::pick_i64).unwrap_or(0),
            stock: value.get("stock").and_then(extract::pick_i64),
            product_image_url: value.get("productImageUrl").and_then(extract::pick_string),
        },
        quantity: quantity.max(1),
    })
}
