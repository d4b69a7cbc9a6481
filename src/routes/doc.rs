use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiSpec;
use utoipa_scalar::{Scalar, Servable};

use crate::{
    checkout::CheckoutOutcome,
    models::{BulkItem, BulkQueue, CartItem, OrderSummary, PendingPayment, Product},
    response::{ApiResponse, Meta},
    routes::{cart, checkout, health, orders, payments},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        cart::cart_view,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        cart::clear_cart,
        checkout::checkout,
        checkout::bulk_checkout,
        checkout::next_checkout,
        payments::payment_success,
        payments::payment_fail,
        orders::list_orders,
        orders::get_order,
        orders::clear_history
    ),
    components(
        schemas(
            Product,
            CartItem,
            PendingPayment,
            BulkItem,
            BulkQueue,
            OrderSummary,
            cart::CartView,
            cart::AddToCartRequest,
            cart::UpdateQuantityRequest,
            checkout::CheckoutRequest,
            checkout::BulkCheckoutRequest,
            CheckoutOutcome,
            payments::PaymentResult,
            orders::OrderList,
            Meta,
            ApiResponse<CheckoutOutcome>,
            ApiResponse<cart::CartView>,
            ApiResponse<orders::OrderList>,
            ApiResponse<payments::PaymentResult>
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Cart", description = "Local cart endpoints"),
        (name = "Checkout", description = "Checkout initiation endpoints"),
        (name = "Payments", description = "Payment provider callback endpoints"),
        (name = "Orders", description = "Order history endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
