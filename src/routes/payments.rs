use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    checkout::{
        Destination, FailParams, SuccessOutcome, SuccessParams, handle_fail, handle_success,
    },
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Raw success-callback query string as appended by the provider.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SuccessQuery {
    #[serde(rename = "paymentKey")]
    pub payment_key: Option<String>,
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
    pub amount: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FailQuery {
    pub message: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "orderId")]
    pub order_id: Option<String>,
}

/// What the frontend should do after a callback: navigate to `redirect`,
/// showing `message` if present. `payment` carries the confirmation payload
/// on success; `remaining` the number of bulk-checkout items still queued.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentResult {
    pub state: String,
    pub redirect: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub payment: Option<Value>,
    pub remaining: usize,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/success", get(payment_success))
        .route("/fail", get(payment_fail))
}

#[utoipa::path(
    get,
    path = "/api/payments/success",
    params(
        ("paymentKey" = Option<String>, Query, description = "Provider payment key"),
        ("orderId" = Option<String>, Query, description = "Order token echoed by the provider"),
        ("amount" = Option<String>, Query, description = "Charged amount")
    ),
    responses(
        (status = 200, description = "Flow outcome with the route to navigate to", body = ApiResponse<PaymentResult>)
    ),
    tag = "Payments"
)]
pub async fn payment_success(
    State(state): State<AppState>,
    Query(query): Query<SuccessQuery>,
) -> Json<ApiResponse<PaymentResult>> {
    let outcome = handle_success(
        &state,
        SuccessParams {
            payment_key: query.payment_key,
            order_id: query.order_id,
            amount: query.amount,
        },
    )
    .await;

    let result = match outcome {
        SuccessOutcome::Completed { payment, remaining } => PaymentResult {
            state: "done".into(),
            redirect: Destination::OrderComplete.path().into(),
            message: None,
            payment: Some(payment),
            remaining,
        },
        SuccessOutcome::Rejected {
            destination,
            message,
        } => PaymentResult {
            state: "failed".into(),
            redirect: destination.path().into(),
            message: Some(message),
            payment: None,
            remaining: 0,
        },
    };

    Json(ApiResponse::success(
        "Payment result",
        result,
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    get,
    path = "/api/payments/fail",
    params(
        ("message" = Option<String>, Query, description = "Provider error message"),
        ("code" = Option<String>, Query, description = "Provider error code"),
        ("orderId" = Option<String>, Query, description = "Order token of the aborted payment")
    ),
    responses(
        (status = 200, description = "Pending payment cleared, retry route", body = ApiResponse<PaymentResult>)
    ),
    tag = "Payments"
)]
pub async fn payment_fail(
    State(state): State<AppState>,
    Query(query): Query<FailQuery>,
) -> Json<ApiResponse<PaymentResult>> {
    let outcome = handle_fail(
        &state,
        FailParams {
            message: query.message,
            code: query.code,
            order_id: query.order_id,
        },
    );

    let result = PaymentResult {
        state: "failed".into(),
        redirect: outcome.destination.path().into(),
        message: Some(outcome.message),
        payment: None,
        remaining: 0,
    };

    Json(ApiResponse::success(
        "Payment failed",
        result,
        Some(Meta::empty()),
    ))
}
