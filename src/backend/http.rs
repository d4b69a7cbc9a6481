use async_trait::async_trait;
use serde_json::{Value, json};

use crate::extract;
use crate::models::PaymentRecord;

use super::{BackendError, CommerceBackend, CreateOrderRequest, RegisterPaymentRequest};

/// reqwest-backed implementation of [`CommerceBackend`].
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a response into its JSON payload. Success bodies may wrap the
    /// payload in a `{ message, data }` envelope or return it bare; error
    /// bodies yield a [`BackendError::Rejected`] with whatever message and
    /// code can be salvaged.
    async fn payload(resp: reqwest::Response) -> Result<Value, BackendError> {
        let status = resp.status();
        if status.is_success() {
            let body: Value = resp.json().await?;
            return Ok(unwrap_envelope(body));
        }

        let body: Option<Value> = resp.json().await.ok();
        let message = body
            .as_ref()
            .and_then(|b| b.get("message").and_then(extract::pick_string))
            .unwrap_or_else(|| format!("backend rejected the request ({status})"));
        let code = body
            .as_ref()
            .and_then(|b| b.get("code").and_then(extract::pick_string));
        Err(BackendError::Rejected {
            status: status.as_u16(),
            code,
            message,
        })
    }
}

fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

#[async_trait]
impl CommerceBackend for HttpBackend {
    async fn create_order(&self, req: CreateOrderRequest) -> Result<Value, BackendError> {
        let resp = self.http.post(self.url("/orders")).json(&req).send().await?;
        Self::payload(resp).await
    }

    async fn get_order(&self, order_id: i64) -> Result<Value, BackendError> {
        let resp = self
            .http
            .get(self.url(&format!("/orders/{order_id}")))
            .send()
            .await?;
        Self::payload(resp).await
    }

    async fn register_payment(&self, req: RegisterPaymentRequest) -> Result<(), BackendError> {
        let resp = self.http.post(self.url("/payments")).json(&req).send().await?;
        Self::payload(resp).await.map(|_| ())
    }

    async fn confirm_payment(&self, payment_key: String) -> Result<PaymentRecord, BackendError> {
        let resp = self
            .http
            .post(self.url("/payments/confirm"))
            .json(&json!({ "paymentKey": payment_key }))
            .send()
            .await?;
        Self::payload(resp).await.map(PaymentRecord::from_value)
    }

    async fn payment_by_key(&self, payment_key: String) -> Result<PaymentRecord, BackendError> {
        let resp = self
            .http
            .get(self.url(&format!("/payments/{payment_key}")))
            .send()
            .await?;
        Self::payload(resp).await.map(PaymentRecord::from_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_is_unwrapped() {
        let body = json!({ "message": "Ok", "data": { "id": 3 } });
        assert_eq!(unwrap_envelope(body), json!({ "id": 3 }));
    }

    #[test]
    fn bare_body_passes_through() {
        let body = json!({ "id": 3 });
        assert_eq!(unwrap_envelope(body), json!({ "id": 3 }));
    }
}
