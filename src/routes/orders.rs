use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get},
};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    extract,
    models::OrderSummary,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderSummary>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders))
        .route("/history", delete(clear_history))
        .route("/{id}", get(get_order))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses(
        (status = 200, description = "Orders recorded by this client, most recent first", body = ApiResponse<OrderList>)
    ),
    tag = "Orders"
)]
pub async fn list_orders(State(state): State<AppState>) -> Json<ApiResponse<OrderList>> {
    let ids = state.stores.history.load();

    // The history is only an index; each id is re-fetched and validated
    // against the backend. Unresolvable ids stay visible as unavailable.
    let mut items = Vec::with_capacity(ids.len());
    for id in ids {
        let summary = match state.backend.get_order(id).await {
            Ok(detail) => summary_from_detail(id, &detail),
            Err(err) => {
                tracing::debug!(order_id = id, error = %err, "order did not resolve");
                OrderSummary {
                    id,
                    available: false,
                    status: None,
                    total_price: None,
                    created_at: None,
                }
            }
        };
        items.push(summary);
    }

    let meta = Meta::total(items.len() as i64);
    Json(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    responses(
        (status = 200, description = "Order detail as returned by the backend"),
        (status = 502, description = "Backend rejected the lookup")
    ),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ApiResponse<Value>>> {
    let detail = state.backend.get_order(id).await?;
    Ok(Json(ApiResponse::success("Ok", detail, Some(Meta::empty()))))
}

#[utoipa::path(
    delete,
    path = "/api/orders/history",
    responses(
        (status = 200, description = "Local order index cleared")
    ),
    tag = "Orders"
)]
pub async fn clear_history(State(state): State<AppState>) -> Json<ApiResponse<Value>> {
    state.stores.history.clear();
    Json(ApiResponse::success(
        "Order history cleared",
        Value::Null,
        Some(Meta::empty()),
    ))
}

fn summary_from_detail(id: i64, detail: &Value) -> OrderSummary {
    OrderSummary {
        id: extract::order_id(detail).unwrap_or(id),
        available: true,
        status: detail.get("status").and_then(extract::pick_string),
        total_price: extract::amount(detail),
        created_at: detail
            .get("createdAt")
            .or_else(|| detail.get("created_at"))
            .and_then(extract::pick_string),
    }
}
