use actix_web::{http::StatusCode, web, web::ServiceConfig};
use duka_payment_engine::{
    db_types::GatewayStatusReport,
    events::EventProducers,
    traits::{GatewayError, InitiateReceipt, PaymentStoreError},
    PaymentFlowApi,
};
use serde_json::json;

use super::{
    helpers::{completed_payment, get_request, paid_order, pending_payment, post_request, submitted_order, untracked_payment},
    mocks::{MockGateway, MockPaymentStoreDb},
};
use crate::routes::{GatewayWebhookGetRoute, GatewayWebhookPostRoute, InitiatePaymentRoute, PaymentStatusRoute};

fn completed_report() -> GatewayStatusReport {
    GatewayStatusReport {
        status_code: "1".to_string(),
        status_description: "COMPLETED".to_string(),
        confirmation_code: Some("CEB52HQ8XN".to_string()),
        transaction_id: Some("TX-44210".to_string()),
        channel: Some("VODACOM-TZ".to_string()),
        account: Some("255700000001".to_string()),
    }
}

fn register(cfg: &mut ServiceConfig, store: MockPaymentStoreDb, gateway: MockGateway) {
    let api = PaymentFlowApi::new(store, gateway, EventProducers::default());
    cfg.app_data(web::Data::new(api))
        .service(GatewayWebhookGetRoute::<MockPaymentStoreDb, MockGateway>::new())
        .service(GatewayWebhookPostRoute::<MockPaymentStoreDb, MockGateway>::new())
        .service(PaymentStatusRoute::<MockPaymentStoreDb, MockGateway>::new())
        .service(InitiatePaymentRoute::<MockPaymentStoreDb, MockGateway>::new());
}

// ----------------------------------------   Webhook channel  -------------------------------------------------

#[actix_web::test]
async fn webhook_without_reference_is_rejected() {
    let (status, body) = get_request("/gateway/webhook?transid=SPT-998877", configure_no_calls)
        .await
        .expect("Error making request");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Missing required parameter: reference"), "{body}");
}

#[actix_web::test]
async fn webhook_without_transid_is_rejected() {
    let (status, body) =
        get_request("/gateway/webhook?reference=REF-001", configure_no_calls).await.expect("Error making request");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Missing required parameter: transid"), "{body}");
}

fn configure_no_calls(cfg: &mut ServiceConfig) {
    register(cfg, MockPaymentStoreDb::new(), MockGateway::new());
}

#[actix_web::test]
async fn webhook_settles_a_pending_payment() {
    let (status, body) = get_request("/gateway/webhook?transid=SPT-998877&reference=REF-001", configure_happy_webhook)
        .await
        .expect("Error making request");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Payment is Completed"), "{body}");
}

// The webhook arrives over POST as well; same parameters, same handler.
#[actix_web::test]
async fn webhook_over_post_settles_a_pending_payment() {
    let (status, body) =
        post_request("/gateway/webhook?transid=SPT-998877&reference=REF-001", json!({}), configure_happy_webhook)
            .await
            .expect("Error making request");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Payment is Completed"), "{body}");
}

fn configure_happy_webhook(cfg: &mut ServiceConfig) {
    let mut store = MockPaymentStoreDb::new();
    store.expect_fetch_payment_by_reference().returning(|_| Ok(Some(pending_payment())));
    store.expect_settle_payment().returning(|_, _, _| Ok(Some(completed_payment())));
    store.expect_mark_order_paid().returning(|_| Ok(paid_order()));
    let mut gateway = MockGateway::new();
    gateway.expect_query_status().returning(|_| Ok(completed_report()));
    register(cfg, store, gateway);
}

// A redelivered notification acknowledges without touching the store; `settle_payment` has no expectation here, so
// any attempt to call it would fail the test.
#[actix_web::test]
async fn duplicate_webhook_is_acknowledged() {
    let (status, body) = get_request("/gateway/webhook?transid=SPT-998877&reference=REF-001", configure_duplicate)
        .await
        .expect("Error making request");
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Payment is Completed"), "{body}");
}

fn configure_duplicate(cfg: &mut ServiceConfig) {
    let mut store = MockPaymentStoreDb::new();
    store.expect_fetch_payment_by_reference().returning(|_| Ok(Some(completed_payment())));
    let mut gateway = MockGateway::new();
    gateway.expect_query_status().returning(|_| Ok(completed_report()));
    register(cfg, store, gateway);
}

#[actix_web::test]
async fn webhook_for_unknown_reference_is_a_404() {
    let (status, body) = get_request("/gateway/webhook?transid=SPT-998877&reference=REF-BOGUS", configure_unknown_ref)
        .await
        .expect("Error making request");
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("REF-BOGUS"), "{body}");
}

fn configure_unknown_ref(cfg: &mut ServiceConfig) {
    let mut store = MockPaymentStoreDb::new();
    store.expect_fetch_payment_by_reference().returning(|_| Ok(None));
    let mut gateway = MockGateway::new();
    gateway.expect_query_status().returning(|_| Ok(completed_report()));
    register(cfg, store, gateway);
}

// Storage faults must bubble out as a 500 so that the gateway redelivers the notification later.
#[actix_web::test]
async fn webhook_storage_fault_is_a_500() {
    let (status, _body) = get_request("/gateway/webhook?transid=SPT-998877&reference=REF-001", configure_db_down)
        .await
        .expect("Error making request");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

fn configure_db_down(cfg: &mut ServiceConfig) {
    let mut store = MockPaymentStoreDb::new();
    store
        .expect_fetch_payment_by_reference()
        .returning(|_| Err(PaymentStoreError::DatabaseError("disk I/O error".to_string())));
    let mut gateway = MockGateway::new();
    gateway.expect_query_status().returning(|_| Ok(completed_report()));
    register(cfg, store, gateway);
}

#[actix_web::test]
async fn webhook_with_unreachable_gateway_is_a_500() {
    let (status, _body) = get_request("/gateway/webhook?transid=SPT-998877&reference=REF-001", configure_gateway_down)
        .await
        .expect("Error making request");
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

fn configure_gateway_down(cfg: &mut ServiceConfig) {
    let mut gateway = MockGateway::new();
    gateway.expect_query_status().returning(|_| Err(GatewayError::Transport("connection refused".to_string())));
    register(cfg, MockPaymentStoreDb::new(), gateway);
}

// ------------------------------------------   Poll channel  --------------------------------------------------

#[actix_web::test]
async fn status_of_unknown_payment_is_a_404() {
    let (status, _body) =
        get_request("/payments/pay-bogus/status", configure_unknown_payment).await.expect("Error making request");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn configure_unknown_payment(cfg: &mut ServiceConfig) {
    let mut store = MockPaymentStoreDb::new();
    store.expect_fetch_payment().returning(|_| Ok(None));
    register(cfg, store, MockGateway::new());
}

// A terminal payment is served straight from the store; the gateway mock has no expectations, so any call to it
// would fail the test.
#[actix_web::test]
async fn status_of_completed_payment_comes_from_the_store() {
    let (status, body) = get_request("/payments/pay-0000000000000001/status", configure_completed_payment)
        .await
        .expect("Error making request");
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&body).expect("Invalid JSON response");
    assert_eq!(response["status"], "Completed");
    assert_eq!(response["confirmation_code"], "CEB52HQ8XN");
    assert!(response["payment_date"].is_string());
}

fn configure_completed_payment(cfg: &mut ServiceConfig) {
    let mut store = MockPaymentStoreDb::new();
    store.expect_fetch_payment().returning(|_| Ok(Some(completed_payment())));
    register(cfg, store, MockGateway::new());
}

// When the gateway cannot be reached, the poll degrades to the last stored state instead of failing.
#[actix_web::test]
async fn status_poll_survives_a_gateway_outage() {
    let (status, body) = get_request("/payments/pay-0000000000000001/status", configure_poll_gateway_down)
        .await
        .expect("Error making request");
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&body).expect("Invalid JSON response");
    assert_eq!(response["status"], "Pending");
    assert!(response["payment_date"].is_null());
}

fn configure_poll_gateway_down(cfg: &mut ServiceConfig) {
    let mut store = MockPaymentStoreDb::new();
    store.expect_fetch_payment().returning(|_| Ok(Some(pending_payment())));
    let mut gateway = MockGateway::new();
    gateway.expect_query_status().returning(|_| Err(GatewayError::Timeout));
    register(cfg, store, gateway);
}

// The payment settles but the order write fails: the poll still answers with the settled payment, and the order
// is left to the sync sweep. The caller must never see a 500 for a state we know.
#[actix_web::test]
async fn status_poll_reports_settled_payment_when_order_write_fails() {
    let (status, body) = get_request("/payments/pay-0000000000000001/status", configure_poll_order_write_fails)
        .await
        .expect("Error making request");
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&body).expect("Invalid JSON response");
    assert_eq!(response["status"], "Completed");
    assert_eq!(response["confirmation_code"], "CEB52HQ8XN");
}

fn configure_poll_order_write_fails(cfg: &mut ServiceConfig) {
    let mut store = MockPaymentStoreDb::new();
    store.expect_fetch_payment().times(1).returning(|_| Ok(Some(pending_payment())));
    store.expect_fetch_payment().returning(|_| Ok(Some(completed_payment())));
    store.expect_fetch_payment_by_reference().returning(|_| Ok(Some(pending_payment())));
    store.expect_settle_payment().returning(|_, _, _| Ok(Some(completed_payment())));
    store.expect_mark_order_paid().returning(|_| Err(PaymentStoreError::DatabaseError("disk I/O error".to_string())));
    let mut gateway = MockGateway::new();
    gateway.expect_query_status().returning(|_| Ok(completed_report()));
    register(cfg, store, gateway);
}

// A storage fault midway through reconciliation degrades to the stored state instead of failing the poll.
#[actix_web::test]
async fn status_poll_survives_a_storage_fault_during_reconciliation() {
    let (status, body) = get_request("/payments/pay-0000000000000001/status", configure_poll_storage_fault)
        .await
        .expect("Error making request");
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&body).expect("Invalid JSON response");
    assert_eq!(response["status"], "Pending");
}

fn configure_poll_storage_fault(cfg: &mut ServiceConfig) {
    let mut store = MockPaymentStoreDb::new();
    store.expect_fetch_payment().returning(|_| Ok(Some(pending_payment())));
    store
        .expect_fetch_payment_by_reference()
        .returning(|_| Err(PaymentStoreError::DatabaseError("disk I/O error".to_string())));
    let mut gateway = MockGateway::new();
    gateway.expect_query_status().returning(|_| Ok(completed_report()));
    register(cfg, store, gateway);
}

// -------------------------------------------   Initiation  ---------------------------------------------------

fn init_body() -> serde_json::Value {
    json!({
        "order_id": "O-1001",
        "reference_number": "REF-001",
        "amount": 1_500_000,
        "phone_number": "255700000001"
    })
}

#[actix_web::test]
async fn initiate_payment_returns_the_tracking_id() {
    let (status, body) = post_request("/payments", init_body(), configure_initiation).await.expect("Error making request");
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&body).expect("Invalid JSON response");
    assert_eq!(response["success"], true);
    assert_eq!(response["tracking_id"], "SPT-998877");
    assert_eq!(response["reference_number"], "REF-001");
}

fn configure_initiation(cfg: &mut ServiceConfig) {
    let mut store = MockPaymentStoreDb::new();
    store.expect_fetch_order().returning(|_| Ok(Some(submitted_order())));
    store.expect_insert_payment().returning(|_| Ok((untracked_payment(), true)));
    store.expect_attach_tracking_id().returning(|_, _| Ok(pending_payment()));
    let mut gateway = MockGateway::new();
    gateway.expect_initiate().returning(|_| Ok(InitiateReceipt { tracking_id: "SPT-998877".to_string() }));
    register(cfg, store, gateway);
}

#[actix_web::test]
async fn initiation_for_unknown_order_is_a_404() {
    let (status, _body) =
        post_request("/payments", init_body(), configure_init_unknown_order).await.expect("Error making request");
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn configure_init_unknown_order(cfg: &mut ServiceConfig) {
    let mut store = MockPaymentStoreDb::new();
    store.expect_fetch_order().returning(|_| Ok(None));
    register(cfg, store, MockGateway::new());
}

#[actix_web::test]
async fn initiation_rejected_by_the_gateway_is_a_400() {
    let (status, body) =
        post_request("/payments", init_body(), configure_init_rejected).await.expect("Error making request");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("insufficient funds"), "{body}");
}

fn configure_init_rejected(cfg: &mut ServiceConfig) {
    let mut store = MockPaymentStoreDb::new();
    store.expect_fetch_order().returning(|_| Ok(Some(submitted_order())));
    store.expect_insert_payment().returning(|_| Ok((untracked_payment(), true)));
    let mut gateway = MockGateway::new();
    gateway.expect_initiate().returning(|_| Err(GatewayError::Rejected("insufficient funds".to_string())));
    register(cfg, store, gateway);
}

#[actix_web::test]
async fn initiation_with_blank_phone_number_is_rejected() {
    let body = json!({
        "order_id": "O-1001",
        "reference_number": "REF-001",
        "amount": 1_500_000,
        "phone_number": "  "
    });
    let (status, body) = post_request("/payments", body, configure_no_calls).await.expect("Error making request");
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("phone_number"), "{body}");
}
