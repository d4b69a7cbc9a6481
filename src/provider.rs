//! Payment provider seam.
//!
//! The provider owns the actual payment UI: checkout hands the user off to
//! its hosted page and control only comes back through the success/fail
//! callback URLs, with provider-appended query parameters. The trait covers
//! the single "request payment" operation; it can be rejected before any
//! redirect happens, in which case checkout aborts but the created order
//! survives as an abandoned order.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Amount to charge, minor units.
    pub amount: i64,
    /// Provider-facing order identifier; echoed back on redirect and must
    /// match the backend's order number.
    pub order_token: String,
    /// Human-readable label shown on the payment page.
    pub order_name: String,
    pub success_url: String,
    pub fail_url: String,
}

/// Where to send the user to complete payment.
#[derive(Debug, Clone)]
pub struct PaymentHandoff {
    pub checkout_url: String,
}

#[automock]
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn request_payment(&self, req: PaymentRequest) -> Result<PaymentHandoff, ProviderError>;
}

/// Builds the hosted-checkout URL for the provider's payment page, keyed by
/// the publishable client key.
#[derive(Debug, Clone)]
pub struct HostedCheckout {
    checkout_url: String,
    client_key: String,
}

impl HostedCheckout {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            checkout_url: config.provider_checkout_url.clone(),
            client_key: config.provider_client_key.clone(),
        }
    }
}

#[async_trait]
impl PaymentProvider for HostedCheckout {
    async fn request_payment(&self, req: PaymentRequest) -> Result<PaymentHandoff, ProviderError> {
        if req.amount <= 0 {
            return Err(ProviderError::Rejected(format!(
                "invalid payment amount: {}",
                req.amount
            )));
        }
        if req.order_token.trim().is_empty() {
            return Err(ProviderError::Rejected("empty order token".into()));
        }

        let query = [
            ("clientKey", self.client_key.as_str()),
            ("amount", &req.amount.to_string()),
            ("orderId", &req.order_token),
            ("orderName", &req.order_name),
            ("successUrl", &req.success_url),
            ("failUrl", &req.fail_url),
        ]
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencode(v)))
        .collect::<Vec<_>>()
        .join("&");

        Ok(PaymentHandoff {
            checkout_url: format!("{}?{}", self.checkout_url, query),
        })
    }
}

/// Minimal percent-encoding for query values.
fn urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
