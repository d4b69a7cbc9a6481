use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    models::{CartItem, Product},
    response::{ApiResponse, Meta},
    state::AppState,
    store::cart,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product: Product,
    pub quantity: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartItem>,
    /// Sum of unit price x quantity, minor units.
    pub total: i64,
}

impl CartView {
    fn from_items(items: Vec<CartItem>) -> Self {
        let total = cart::total(&items);
        Self { items, total }
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(cart_view).delete(clear_cart))
        .route("/items", post(add_to_cart))
        .route(
            "/items/{product_id}",
            patch(update_quantity).delete(remove_from_cart),
        )
}

#[utoipa::path(
    get,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart contents and total", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn cart_view(State(state): State<AppState>) -> Json<ApiResponse<CartView>> {
    let view = CartView::from_items(state.stores.cart.load());
    let meta = Meta::total(view.items.len() as i64);
    Json(ApiResponse::success("Ok", view, Some(meta)))
}

#[utoipa::path(
    post,
    path = "/api/cart/items",
    request_body = AddToCartRequest,
    responses(
        (status = 200, description = "Item merged into the cart", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(payload): Json<AddToCartRequest>,
) -> Json<ApiResponse<CartView>> {
    let items = state.stores.cart.add(payload.product, payload.quantity);
    Json(ApiResponse::success(
        "Added to cart",
        CartView::from_items(items),
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    patch,
    path = "/api/cart/items/{product_id}",
    request_body = UpdateQuantityRequest,
    responses(
        (status = 200, description = "Quantity updated; zero or less removes the item", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
    Json(payload): Json<UpdateQuantityRequest>,
) -> Json<ApiResponse<CartView>> {
    let items = state.stores.cart.update_quantity(product_id, payload.quantity);
    Json(ApiResponse::success(
        "Cart updated",
        CartView::from_items(items),
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/cart/items/{product_id}",
    responses(
        (status = 200, description = "Item removed", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> Json<ApiResponse<CartView>> {
    let items = state.stores.cart.remove(product_id);
    Json(ApiResponse::success(
        "Item removed",
        CartView::from_items(items),
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/cart",
    responses(
        (status = 200, description = "Cart cleared", body = ApiResponse<CartView>)
    ),
    tag = "Cart"
)]
pub async fn clear_cart(State(state): State<AppState>) -> Json<ApiResponse<CartView>> {
    state.stores.cart.clear();
    Json(ApiResponse::success(
        "Cart cleared",
        CartView::from_items(Vec::new()),
        Some(Meta::empty()),
    ))
}
