use std::sync::Arc;

use serde_json::json;

use pentagon_storefront::{
    backend::{BackendError, MockCommerceBackend},
    checkout::start_checkout,
    config::AppConfig,
    error::AppError,
    models::Product,
    provider::{MockPaymentProvider, PaymentHandoff, ProviderError},
    state::AppState,
    store::Stores,
};

// A create-order response carrying neither a total nor an order number: the
// token comes from the follow-up order fetch and the amount from the local
// price x quantity fallback.
#[tokio::test]
async fn checkout_falls_back_to_order_detail_for_token_and_local_amount() {
    let mut backend = MockCommerceBackend::new();
    backend
        .expect_create_order()
        .withf(|req| req.product_id == 10 && req.quantity == 3)
        .returning(|_| Ok(json!({ "id": 77 })));
    backend
        .expect_get_order()
        .withf(|id| *id == 77)
        .returning(|_| Ok(json!({ "orderNumber": "ORD-100" })));

    let mut provider = MockPaymentProvider::new();
    provider
        .expect_request_payment()
        .withf(|req| {
            req.amount == 6000 && req.order_token == "ORD-100" && req.order_name == "전투화"
        })
        .returning(|_| {
            Ok(PaymentHandoff {
                checkout_url: "https://pay.test/checkout?orderId=ORD-100".into(),
            })
        });

    let state = test_state(backend, provider);
    let outcome = start_checkout(&state, product(10, "전투화", 2000), 3)
        .await
        .unwrap();

    assert_eq!(outcome.order_id, 77);
    assert_eq!(outcome.order_token, "ORD-100");
    assert_eq!(outcome.amount, 6000);

    let pending = state.stores.pending.get("ORD-100").unwrap();
    assert_eq!(pending.order_id, 77);
    assert_eq!(pending.amount, 6000);
    assert_eq!(state.stores.history.load(), vec![77]);
}

#[tokio::test]
async fn checkout_prefers_backend_total_and_inline_token() {
    let mut backend = MockCommerceBackend::new();
    backend.expect_create_order().returning(|_| {
        Ok(json!({ "id": 5, "totalPrice": 9999, "orderNumber": "ORD-5" }))
    });
    // No get_order expectation: the fallback call must not happen.

    let mut provider = MockPaymentProvider::new();
    provider
        .expect_request_payment()
        .withf(|req| req.amount == 9999 && req.order_token == "ORD-5")
        .returning(|_| {
            Ok(PaymentHandoff {
                checkout_url: "https://pay.test/checkout".into(),
            })
        });

    let state = test_state(backend, provider);
    let outcome = start_checkout(&state, product(1, "전투모", 2000), 2)
        .await
        .unwrap();
    assert_eq!(outcome.amount, 9999);
}

#[tokio::test]
async fn missing_order_id_aborts_before_payment() {
    let mut backend = MockCommerceBackend::new();
    backend
        .expect_create_order()
        .returning(|_| Ok(json!({ "message": "created" })));

    // Provider must never be invoked.
    let provider = MockPaymentProvider::new();

    let state = test_state(backend, provider);
    let err = start_checkout(&state, product(1, "수통", 1000), 1)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::InvalidOrderResponse(_)));
    assert!(state.stores.history.load().is_empty());
}

#[tokio::test]
async fn missing_order_token_aborts_but_keeps_order_in_history() {
    let mut backend = MockCommerceBackend::new();
    backend
        .expect_create_order()
        .returning(|_| Ok(json!({ "id": 31 })));
    backend
        .expect_get_order()
        .returning(|_| Ok(json!({ "id": 31, "status": "CREATED" })));

    let provider = MockPaymentProvider::new();

    let state = test_state(backend, provider);
    let err = start_checkout(&state, product(2, "군장", 3000), 1)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::MissingOrderToken));
    // The order exists on the backend; it stays discoverable.
    assert_eq!(state.stores.history.load(), vec![31]);
    assert!(state.stores.pending.get("31").is_none());
}

#[tokio::test]
async fn token_fallback_survives_a_failing_detail_fetch() {
    let mut backend = MockCommerceBackend::new();
    backend
        .expect_create_order()
        .returning(|_| Ok(json!({ "id": 8 })));
    backend.expect_get_order().returning(|_| {
        Err(BackendError::Rejected {
            status: 500,
            code: None,
            message: "boom".into(),
        })
    });

    let provider = MockPaymentProvider::new();

    let state = test_state(backend, provider);
    let err = start_checkout(&state, product(2, "군장", 3000), 1)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MissingOrderToken));
}

#[tokio::test]
async fn provider_rejection_leaves_the_created_order_intact() {
    let mut backend = MockCommerceBackend::new();
    backend
        .expect_create_order()
        .returning(|_| Ok(json!({ "id": 12, "orderNumber": "ORD-12", "totalPrice": 500 })));

    let mut provider = MockPaymentProvider::new();
    provider
        .expect_request_payment()
        .returning(|_| Err(ProviderError::Rejected("window rejected".into())));

    let state = test_state(backend, provider);
    let err = start_checkout(&state, product(3, "깔깔이", 500), 1)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Provider(_)));
    // Abandoned order: still in history, pending mapping still present so a
    // late provider redirect could still resolve.
    assert_eq!(state.stores.history.load(), vec![12]);
    assert!(state.stores.pending.get("ORD-12").is_some());
}

#[tokio::test]
async fn quantity_is_clamped_to_at_least_one() {
    let mut backend = MockCommerceBackend::new();
    backend
        .expect_create_order()
        .withf(|req| req.quantity == 1)
        .returning(|_| Ok(json!({ "id": 1, "orderNumber": "ORD-1", "totalPrice": 100 })));

    let mut provider = MockPaymentProvider::new();
    provider.expect_request_payment().returning(|_| {
        Ok(PaymentHandoff {
            checkout_url: "https://pay.test/checkout".into(),
        })
    });

    let state = test_state(backend, provider);
    start_checkout(&state, product(9, "견장", 100), 0)
        .await
        .unwrap();
}

fn product(id: i64, name: &str, price: i64) -> Product {
    Product {
        product_id: id,
        name: name.to_string(),
        description: None,
        price,
        stock: Some(10),
        product_image_url: None,
    }
}

fn test_state(backend: MockCommerceBackend, provider: MockPaymentProvider) -> AppState {
    AppState::new(
        test_config(),
        Arc::new(backend),
        Arc::new(provider),
        Stores::in_memory(),
    )
}

fn test_config() -> AppConfig {
    AppConfig {
        backend_base_url: "http://backend.test/api".into(),
        provider_client_key: "pk_test".into(),
        provider_checkout_url: "https://pay.test/checkout".into(),
        public_base_url: "http://localhost:3000".into(),
        storage_dir: std::env::temp_dir(),
        host: "127.0.0.1".into(),
        port: 0,
    }
}
