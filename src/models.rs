use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::extract;

/// Product snapshot carried by the frontend into cart and checkout
/// requests. Field names follow the frontend's JSON convention.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unit price in minor currency units.
    pub price: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: i64,
}

/// Session-scoped mapping stored immediately before handing off to the
/// payment provider. The provider's return redirect only carries the order
/// token, so the internal order id and amount must be recovered from here.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PendingPayment {
    /// Internal primary key of the backend order.
    #[serde(rename = "orderPk")]
    pub order_id: i64,
    pub amount: i64,
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
}

/// One unit of the bulk-checkout queue. Each item becomes a fully
/// independent order/payment pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkItem {
    pub product: Product,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BulkQueue {
    pub index: usize,
    pub items: Vec<BulkItem>,
}

/// Payment record returned by the backend. The contract only guarantees a
/// status field; the rest of the payload is passed through untouched.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaymentRecord {
    pub status: Option<String>,
    #[schema(value_type = Object)]
    pub raw: Value,
}

impl PaymentRecord {
    /// Terminal success status of a confirmed payment.
    pub const STATUS_DONE: &'static str = "DONE";

    pub fn from_value(raw: Value) -> Self {
        let status = extract::pick_string(raw.get("status").unwrap_or(&Value::Null));
        Self { status, raw }
    }

    pub fn is_done(&self) -> bool {
        self.status.as_deref() == Some(Self::STATUS_DONE)
    }
}

/// Entry of the "my orders" view. Ids that no longer resolve against the
/// backend are shown as unavailable rather than dropped from the index.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: i64,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}
