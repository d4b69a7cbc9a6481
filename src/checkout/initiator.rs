use serde::Serialize;
use utoipa::ToSchema;

use crate::backend::CreateOrderRequest;
use crate::error::{AppError, AppResult};
use crate::extract;
use crate::models::Product;
use crate::provider::PaymentRequest;
use crate::state::AppState;

/// Everything the client needs to hand the user to the payment page.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    pub order_id: i64,
    pub order_token: String,
    pub amount: i64,
    pub payment_url: String,
}

/// Creates a backend order for `quantity` of `product` and prepares the
/// provider handoff.
///
/// The order id is recorded into order history as soon as it is known, so
/// abandoned and failed payments stay discoverable. A provider rejection
/// after that point aborts checkout but leaves the order in place.
pub async fn start_checkout(
    state: &AppState,
    product: Product,
    quantity: i64,
) -> AppResult<CheckoutOutcome> {
    let quantity = quantity.max(1);

    let order = state
        .backend
        .create_order(CreateOrderRequest {
            product_id: product.product_id,
            quantity,
        })
        .await?;

    let order_id = extract::order_id(&order)
        .ok_or_else(|| AppError::InvalidOrderResponse("order id".into()))?;

    state.stores.history.add(order_id);

    // Prefer the backend's total; the local product snapshot is the
    // fallback when the response does not carry one.
    let amount = extract::amount(&order).unwrap_or(product.price * quantity);

    let mut order_token = extract::order_token(&order);
    if order_token.is_none() {
        order_token = fetch_order_token(state, order_id).await;
    }
    let order_token = order_token.ok_or(AppError::MissingOrderToken)?;

    state.stores.pending.set(&order_token, order_id, amount);

    tracing::info!(order_id, %order_token, amount, "checkout initiated");

    let handoff = state
        .provider
        .request_payment(PaymentRequest {
            amount,
            order_token: order_token.clone(),
            order_name: product.name,
            success_url: state.config.success_callback_url(),
            fail_url: state.config.fail_callback_url(),
        })
        .await?;

    Ok(CheckoutOutcome {
        order_id,
        order_token,
        amount,
        payment_url: handoff.checkout_url,
    })
}

/// Fallback for create-order responses without an order token: fetch the
/// full order detail and retry extraction. Fetch errors are swallowed; the
/// caller turns a still-missing token into [`AppError::MissingOrderToken`].
async fn fetch_order_token(state: &AppState, order_id: i64) -> Option<String> {
    match state.backend.get_order(order_id).await {
        Ok(detail) => extract::order_token(&detail),
        Err(err) => {
            tracing::warn!(order_id, error = %err, "order detail fetch for token fallback failed");
            None
        }
    }
}
