//! End-to-end webhook intake through the router: signed deliveries land in
//! the projections, everything else is rejected with the documented 400.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use hmac::{Hmac, Mac};
use secrecy::SecretString;
use sha2::Sha256;
use tower::ServiceExt;

use payment_relay::adapters::store::InMemoryProjectionStore;
use payment_relay::application::confirm_subscription::ConfirmSubscriptionHandler;
use payment_relay::application::create_payment_session::{
    CheckoutUrls, CreatePaymentSessionHandler,
};
use payment_relay::application::handle_webhook::HandleWebhookHandler;
use payment_relay::domain::reconciler::Reconciler;
use payment_relay::domain::status::{InvoicePaymentStatus, SubscriptionStatus};
use payment_relay::domain::verifier::WebhookVerifier;
use payment_relay::http::{build_router, AppState};
use payment_relay::ports::payment_gateway::{
    CheckoutSession, CreateCheckoutSession, CreateSubscription, GatewayError, PaymentGateway,
    PaymentIntent, Subscription,
};
use payment_relay::ports::projection_store::ProjectionStore;

const SIGNING_SECRET: &str = "whsec_integration_test_secret";

/// The webhook path never calls the gateway; fail loudly if it does.
struct UnreachableGateway;

#[async_trait]
impl PaymentGateway for UnreachableGateway {
    async fn create_checkout_session(
        &self,
        _request: CreateCheckoutSession,
    ) -> Result<CheckoutSession, GatewayError> {
        panic!("gateway called during webhook intake");
    }

    async fn retrieve_payment_intent(
        &self,
        _payment_intent_id: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        panic!("gateway called during webhook intake");
    }

    async fn attach_payment_method(
        &self,
        _payment_method_id: &str,
        _customer_id: &str,
    ) -> Result<(), GatewayError> {
        panic!("gateway called during webhook intake");
    }

    async fn create_subscription(
        &self,
        _request: CreateSubscription,
    ) -> Result<Subscription, GatewayError> {
        panic!("gateway called during webhook intake");
    }
}

fn build_app() -> (Router, Arc<InMemoryProjectionStore>) {
    let store = Arc::new(InMemoryProjectionStore::new());
    let gateway: Arc<dyn PaymentGateway> = Arc::new(UnreachableGateway);

    let verifier = WebhookVerifier::new(SecretString::new(SIGNING_SECRET.to_string()), 300);
    let reconciler = Reconciler::new(Arc::clone(&store) as Arc<dyn ProjectionStore>);

    let state = AppState {
        create_session: Arc::new(CreatePaymentSessionHandler::new(
            Arc::clone(&gateway),
            CheckoutUrls {
                success_url: "https://app.example.com/success".to_string(),
                cancel_url: "https://app.example.com/cancel".to_string(),
            },
        )),
        confirm_subscription: Arc::new(ConfirmSubscriptionHandler::new(gateway)),
        webhook: Arc::new(HandleWebhookHandler::new(verifier, reconciler)),
    };

    (build_router(state), store)
}

fn sign(timestamp: i64, payload: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(SIGNING_SECRET.as_bytes()).unwrap();
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

fn signed_request(payload: Vec<u8>) -> Request<Body> {
    let timestamp = chrono::Utc::now().timestamp();
    let signature = format!("t={},v1={}", timestamp, sign(timestamp, &payload));
    Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .header("stripe-signature", signature)
        .body(Body::from(payload))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

fn invoice_paid_payload(invoice_id: &str, created: i64) -> Vec<u8> {
    serde_json::json!({
        "id": format!("evt_{invoice_id}"),
        "type": "invoice.payment_succeeded",
        "created": created,
        "data": { "object": { "id": invoice_id, "status": "paid" } }
    })
    .to_string()
    .into_bytes()
}

fn subscription_payload(
    event_id: &str,
    event_type: &str,
    subscription_id: &str,
    status: &str,
    created: i64,
) -> Vec<u8> {
    serde_json::json!({
        "id": event_id,
        "type": event_type,
        "created": created,
        "data": {
            "object": {
                "id": subscription_id,
                "status": status,
                "current_period_end": created + 2_592_000
            }
        }
    })
    .to_string()
    .into_bytes()
}

#[tokio::test]
async fn signed_invoice_payment_lands_in_projection() {
    let (app, store) = build_app();
    let now = chrono::Utc::now().timestamp();

    let response = app
        .oneshot(signed_request(invoice_paid_payload("in_1", now)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, serde_json::json!({ "received": true }));

    let invoice = store.get_invoice("in_1").await.unwrap().unwrap();
    assert_eq!(invoice.status, InvoicePaymentStatus::Paid);
}

#[tokio::test]
async fn minimal_envelope_without_event_id_still_lands() {
    let (app, store) = build_app();

    // Some senders omit the envelope id; dedup is skipped and the guarded
    // upsert alone keeps redelivery safe.
    let payload = serde_json::json!({
        "type": "invoice.payment_succeeded",
        "data": { "object": { "id": "in_1", "status": "paid" } }
    })
    .to_string()
    .into_bytes();

    let response = app.oneshot(signed_request(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, serde_json::json!({ "received": true }));

    let invoice = store.get_invoice("in_1").await.unwrap().unwrap();
    assert_eq!(invoice.status, InvoicePaymentStatus::Paid);
    assert_eq!(store.processed_event_count().await, 0);
}

#[tokio::test]
async fn tampered_body_rejected_with_plaintext_400() {
    let (app, store) = build_app();
    let now = chrono::Utc::now().timestamp();

    let payload = invoice_paid_payload("in_2", now);
    let request = signed_request(payload.clone());

    // Re-issue the request with a mutated body under the original signature.
    let (mut parts, _) = request.into_parts();
    let mut tampered = payload;
    tampered[5] ^= 0xFF;
    parts.headers.insert(
        "content-length",
        tampered.len().to_string().parse().unwrap(),
    );
    let request = Request::from_parts(parts, Body::from(tampered));

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.starts_with("Webhook Error: "), "body was: {body}");

    assert!(store.get_invoice("in_2").await.unwrap().is_none());
}

#[tokio::test]
async fn missing_signature_header_rejected() {
    let (app, _store) = build_app();
    let now = chrono::Utc::now().timestamp();

    let request = Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .body(Body::from(invoice_paid_payload("in_3", now)))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(body.starts_with("Webhook Error: "));
}

#[tokio::test]
async fn expired_timestamp_rejected() {
    let (app, _store) = build_app();
    let old = chrono::Utc::now().timestamp() - 3600;

    let payload = invoice_paid_payload("in_4", old);
    let signature = format!("t={},v1={}", old, sign(old, &payload));
    let request = Request::builder()
        .method("POST")
        .uri("/api/webhook")
        .header("stripe-signature", signature)
        .body(Body::from(payload))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_delivery_acknowledged_once_processed_once() {
    let (app, store) = build_app();
    let now = chrono::Utc::now().timestamp();

    let payload = subscription_payload(
        "evt_dup",
        "customer.subscription.updated",
        "sub_9",
        "active",
        now,
    );

    let first = app
        .clone()
        .oneshot(signed_request(payload.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);

    let second = app.oneshot(signed_request(payload)).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);

    assert_eq!(store.processed_event_count().await, 1);
    let subscription = store.get_subscription("sub_9").await.unwrap().unwrap();
    assert_eq!(subscription.status, SubscriptionStatus::Active);
}

#[tokio::test]
async fn late_update_cannot_revert_cancellation() {
    let (app, store) = build_app();
    let now = chrono::Utc::now().timestamp();

    let deleted = subscription_payload(
        "evt_deleted",
        "customer.subscription.deleted",
        "sub_gone",
        "canceled",
        now,
    );
    let response = app.clone().oneshot(signed_request(deleted)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // An update that predates the cancellation arrives afterwards.
    let stale_update = subscription_payload(
        "evt_stale",
        "customer.subscription.updated",
        "sub_gone",
        "active",
        now - 120,
    );
    let response = app.oneshot(signed_request(stale_update)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let subscription = store.get_subscription("sub_gone").await.unwrap().unwrap();
    assert_eq!(subscription.status, SubscriptionStatus::Canceled);
}

#[tokio::test]
async fn unrecognized_event_type_acknowledged_without_writes() {
    let (app, store) = build_app();
    let now = chrono::Utc::now().timestamp();

    let payload = serde_json::json!({
        "id": "evt_refund",
        "type": "charge.refunded",
        "created": now,
        "data": { "object": { "id": "ch_1" } }
    })
    .to_string()
    .into_bytes();

    let response = app.oneshot(signed_request(payload)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, serde_json::json!({ "received": true }));

    assert!(store.get_subscription("ch_1").await.unwrap().is_none());
    assert!(store.get_invoice("ch_1").await.unwrap().is_none());
    assert_eq!(store.processed_event_count().await, 0);
}
