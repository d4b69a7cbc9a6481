//! Client for the commerce backend's REST API.
//!
//! Only the slice of the backend this gateway depends on is modelled. Order
//! payloads are handed back as loose JSON because the backend's field names
//! have not been stable; see [`crate::extract`] for how they are read.

pub mod http;

pub use http::HttpBackend;

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::PaymentRecord;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status. `code` is the
    /// structured error code when the body carries one.
    #[error("{message}")]
    Rejected {
        status: u16,
        code: Option<String>,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub product_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPaymentRequest {
    pub order_id: i64,
    pub payment_key: String,
}

#[automock]
#[async_trait]
pub trait CommerceBackend: Send + Sync {
    /// `POST /orders`. Returns the order payload; shape varies, see
    /// [`crate::extract`].
    async fn create_order(&self, req: CreateOrderRequest) -> Result<Value, BackendError>;

    /// `GET /orders/{id}`. Fallback source for the order token, and the
    /// per-id fetch behind the orders view.
    async fn get_order(&self, order_id: i64) -> Result<Value, BackendError>;

    /// `POST /payments`. Links the provider payment key to the internal
    /// order. Callers tolerate failure here; a reload re-registers.
    async fn register_payment(&self, req: RegisterPaymentRequest) -> Result<(), BackendError>;

    /// `POST /payments/confirm`. Finalizes the payment with the provider.
    async fn confirm_payment(&self, payment_key: String) -> Result<PaymentRecord, BackendError>;

    /// `GET /payments/{paymentKey}`. Used only to reconcile a failed
    /// confirmation against the actual payment state.
    async fn payment_by_key(&self, payment_key: String) -> Result<PaymentRecord, BackendError>;
}
