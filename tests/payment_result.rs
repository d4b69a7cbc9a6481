use std::sync::Arc;

use serde_json::json;

use pentagon_storefront::{
    backend::{BackendError, MockCommerceBackend},
    checkout::{Destination, FailParams, SuccessOutcome, SuccessParams, handle_fail, handle_success},
    config::AppConfig,
    models::{BulkItem, PaymentRecord, Product},
    provider::MockPaymentProvider,
    state::AppState,
    store::Stores,
};

fn params(payment_key: &str, order_id: &str, amount: &str) -> SuccessParams {
    SuccessParams {
        payment_key: Some(payment_key.into()),
        order_id: Some(order_id.into()),
        amount: Some(amount.into()),
    }
}

#[tokio::test]
async fn confirms_and_clears_pending_on_success() {
    let mut backend = MockCommerceBackend::new();
    backend
        .expect_register_payment()
        .withf(|req| req.order_id == 42 && req.payment_key == "PK1")
        .returning(|_| Ok(()));
    backend
        .expect_confirm_payment()
        .withf(|key| key == "PK1")
        .returning(|_| Ok(record(json!({ "status": "DONE", "orderId": "ORD-100" }))));

    let state = test_state(backend);
    state.stores.pending.set("ORD-100", 42, 6000);

    let outcome = handle_success(&state, params("PK1", "ORD-100", "6000")).await;

    match outcome {
        SuccessOutcome::Completed { payment, remaining } => {
            assert_eq!(payment["status"], "DONE");
            assert_eq!(remaining, 0);
        }
        other => panic!("expected completion, got {other:?}"),
    }
    assert!(state.stores.pending.get("ORD-100").is_none());
}

#[tokio::test]
async fn registration_failure_does_not_block_confirmation() {
    let mut backend = MockCommerceBackend::new();
    backend.expect_register_payment().returning(|_| {
        Err(BackendError::Rejected {
            status: 409,
            code: None,
            message: "payment already registered".into(),
        })
    });
    backend
        .expect_confirm_payment()
        .returning(|_| Ok(record(json!({ "status": "DONE" }))));

    let state = test_state(backend);
    state.stores.pending.set("ORD-100", 42, 6000);

    let outcome = handle_success(&state, params("PK1", "ORD-100", "6000")).await;
    assert!(matches!(outcome, SuccessOutcome::Completed { .. }));
}

// A missing mapping means a replayed or stale redirect. No backend call may
// happen; the mocks would panic on any.
#[tokio::test]
async fn missing_pending_mapping_redirects_to_orders_without_backend_calls() {
    let state = test_state(MockCommerceBackend::new());

    let outcome = handle_success(&state, params("PK1", "ORD-100", "6000")).await;

    match outcome {
        SuccessOutcome::Rejected {
            destination,
            message,
        } => {
            assert_eq!(destination, Destination::Orders);
            assert!(message.contains("mapping not found"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn non_numeric_amount_fails_validation_before_any_backend_call() {
    let state = test_state(MockCommerceBackend::new());
    state.stores.pending.set("ORD-100", 42, 6000);

    let outcome = handle_success(&state, params("PK1", "ORD-100", "abc")).await;

    match outcome {
        SuccessOutcome::Rejected { destination, .. } => {
            assert_eq!(destination, Destination::Home)
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    // The mapping is untouched; a corrected redirect could still resolve.
    assert!(state.stores.pending.get("ORD-100").is_some());
}

#[tokio::test]
async fn missing_parameters_redirect_home() {
    let state = test_state(MockCommerceBackend::new());

    let outcome = handle_success(
        &state,
        SuccessParams {
            payment_key: None,
            order_id: Some("ORD-100".into()),
            amount: Some("6000".into()),
        },
    )
    .await;

    assert!(matches!(
        outcome,
        SuccessOutcome::Rejected {
            destination: Destination::Home,
            ..
        }
    ));
}

// A reload re-confirms a payment that already went through. The free-text
// failure is reconciled against the actual payment state.
#[tokio::test]
async fn already_processed_failure_is_reconciled_via_payment_lookup() {
    let mut backend = MockCommerceBackend::new();
    backend.expect_register_payment().returning(|_| Ok(()));
    backend.expect_confirm_payment().returning(|_| {
        Err(BackendError::Rejected {
            status: 400,
            code: None,
            message: "이미 처리된 결제입니다 (already processed)".into(),
        })
    });
    backend
        .expect_payment_by_key()
        .withf(|key| key == "PK1")
        .returning(|_| Ok(record(json!({ "status": "DONE", "paymentKey": "PK1" }))));

    let state = test_state(backend);
    state.stores.pending.set("ORD-100", 42, 6000);

    let outcome = handle_success(&state, params("PK1", "ORD-100", "6000")).await;

    assert!(matches!(outcome, SuccessOutcome::Completed { .. }));
    assert!(state.stores.pending.get("ORD-100").is_none());
}

#[tokio::test]
async fn unreconciled_failure_redirects_to_products_with_both_errors() {
    let mut backend = MockCommerceBackend::new();
    backend.expect_register_payment().returning(|_| {
        Err(BackendError::Rejected {
            status: 500,
            code: None,
            message: "registration exploded".into(),
        })
    });
    backend.expect_confirm_payment().returning(|_| {
        Err(BackendError::Rejected {
            status: 400,
            code: None,
            message: "card declined".into(),
        })
    });

    let state = test_state(backend);
    state.stores.pending.set("ORD-100", 42, 6000);

    let outcome = handle_success(&state, params("PK1", "ORD-100", "6000")).await;

    match outcome {
        SuccessOutcome::Rejected {
            destination,
            message,
        } => {
            assert_eq!(destination, Destination::Products);
            assert!(message.contains("card declined"));
            assert!(message.contains("registration exploded"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
    // Terminal failure on confirmation does not clear the mapping; it
    // expires with the session.
    assert!(state.stores.pending.get("ORD-100").is_some());
}

#[tokio::test]
async fn reconciliation_with_non_terminal_status_stays_failed() {
    let mut backend = MockCommerceBackend::new();
    backend.expect_register_payment().returning(|_| Ok(()));
    backend.expect_confirm_payment().returning(|_| {
        Err(BackendError::Rejected {
            status: 409,
            code: Some("DUPLICATE_PAYMENT_REQUEST".into()),
            message: "duplicate".into(),
        })
    });
    backend
        .expect_payment_by_key()
        .returning(|_| Ok(record(json!({ "status": "CANCELED" }))));

    let state = test_state(backend);
    state.stores.pending.set("ORD-100", 42, 6000);

    let outcome = handle_success(&state, params("PK1", "ORD-100", "6000")).await;
    assert!(matches!(
        outcome,
        SuccessOutcome::Rejected {
            destination: Destination::Products,
            ..
        }
    ));
}

#[tokio::test]
async fn completed_payment_advances_the_bulk_queue() {
    let mut backend = MockCommerceBackend::new();
    backend.expect_register_payment().returning(|_| Ok(()));
    backend
        .expect_confirm_payment()
        .returning(|_| Ok(record(json!({ "status": "DONE" }))));

    let state = test_state(backend);
    state
        .stores
        .bulk
        .set(vec![bulk_item(1), bulk_item(2), bulk_item(3)]);
    state.stores.pending.set("ORD-1", 101, 1000);

    let outcome = handle_success(&state, params("PK1", "ORD-1", "1000")).await;
    match outcome {
        SuccessOutcome::Completed { remaining, .. } => assert_eq!(remaining, 2),
        other => panic!("expected completion, got {other:?}"),
    }
    assert_eq!(state.stores.bulk.current().unwrap().product.product_id, 2);

    // Last item: the queue clears once everything is paid.
    state.stores.bulk.set(vec![bulk_item(9)]);
    state.stores.pending.set("ORD-9", 109, 1000);
    let outcome = handle_success(&state, params("PK2", "ORD-9", "1000")).await;
    match outcome {
        SuccessOutcome::Completed { remaining, .. } => assert_eq!(remaining, 0),
        other => panic!("expected completion, got {other:?}"),
    }
    assert!(state.stores.bulk.load().is_none());
}

#[tokio::test]
async fn fail_callback_clears_pending_and_offers_retry() {
    let state = test_state(MockCommerceBackend::new());
    state.stores.pending.set("ORD-100", 42, 6000);

    let outcome = handle_fail(
        &state,
        FailParams {
            message: Some("사용자가 결제를 취소했습니다".into()),
            code: Some("PAY_PROCESS_CANCELED".into()),
            order_id: Some("ORD-100".into()),
        },
    );

    assert_eq!(outcome.destination, Destination::Products);
    assert!(outcome.message.contains("PAY_PROCESS_CANCELED"));
    assert!(state.stores.pending.get("ORD-100").is_none());
}

fn record(value: serde_json::Value) -> PaymentRecord {
    PaymentRecord::from_value(value)
}

fn bulk_item(id: i64) -> BulkItem {
    BulkItem {
        product: Product {
            product_id: id,
            name: format!("product-{id}"),
            description: None,
            price: 1000,
            stock: None,
            product_image_url: None,
        },
        quantity: 1,
    }
}

fn test_state(backend: MockCommerceBackend) -> AppState {
    AppState::new(
        test_config(),
        Arc::new(backend),
        Arc::new(MockPaymentProvider::new()),
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
