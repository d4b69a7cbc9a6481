use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    checkout::{CheckoutOutcome, start_checkout},
    error::{AppError, AppResult},
    models::{BulkItem, Product},
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub product: Product,
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct BulkCheckoutRequest {
    pub items: Vec<BulkItem>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(checkout))
        .route("/bulk", post(bulk_checkout))
        .route("/next", get(next_checkout))
}

#[utoipa::path(
    post,
    path = "/api/checkout",
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Order created, payment handoff prepared", body = ApiResponse<CheckoutOutcome>),
        (status = 502, description = "Backend or provider rejected the checkout")
    ),
    tag = "Checkout"
)]
pub async fn checkout(
    State(state): State<AppState>,
    Json(payload): Json<CheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutOutcome>>> {
    let outcome = start_checkout(&state, payload.product, payload.quantity).await?;
    Ok(Json(ApiResponse::success(
        "Checkout initiated",
        outcome,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    post,
    path = "/api/checkout/bulk",
    request_body = BulkCheckoutRequest,
    responses(
        (status = 200, description = "Queue stored, checkout of the first item initiated", body = ApiResponse<CheckoutOutcome>),
        (status = 400, description = "Empty item list")
    ),
    tag = "Checkout"
)]
pub async fn bulk_checkout(
    State(state): State<AppState>,
    Json(payload): Json<BulkCheckoutRequest>,
) -> AppResult<Json<ApiResponse<CheckoutOutcome>>> {
    let Some(first) = payload.items.first().cloned() else {
        return Err(AppError::BadRequest("bulk checkout needs at least one item".into()));
    };
    state.stores.bulk.set(payload.items);

    let outcome = match start_checkout(&state, first.product, first.quantity).await {
        Ok(outcome) => outcome,
        Err(err) => {
            // A dead queue would otherwise keep re-entering a failing checkout.
            state.stores.bulk.clear();
            return Err(err);
        }
    };
    Ok(Json(ApiResponse::success(
        "Bulk checkout initiated",
        outcome,
        Some(Meta::empty()),
    )))
}

#[utoipa::path(
    get,
    path = "/api/checkout/next",
    responses(
        (status = 200, description = "Checkout of the current queue item initiated", body = ApiResponse<CheckoutOutcome>),
        (status = 404, description = "No bulk checkout in progress")
    ),
    tag = "Checkout"
)]
pub async fn next_checkout(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<CheckoutOutcome>>> {
    let Some(item) = state.stores.bulk.current() else {
        return Err(AppError::NotFound);
    };
    let outcome = start_checkout(&state, item.product, item.quantity).await?;
    Ok(Json(ApiResponse::success(
        "Checkout initiated",
        outcome,
        Some(Meta::empty()),
    )))
}
