//! Request handlers and shared application state

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use super::dto::{
    ConfirmSubscriptionRequest, ConfirmSubscriptionResponse, CreatePaymentSessionRequest,
    CreatePaymentSessionResponse, ErrorResponse, WebhookAck,
};
use crate::application::confirm_subscription::{
    ConfirmSubscriptionCommand, ConfirmSubscriptionError, ConfirmSubscriptionHandler,
};
use crate::application::create_payment_session::CreatePaymentSessionHandler;
use crate::application::handle_webhook::HandleWebhookHandler;

#[derive(Clone)]
pub struct AppState {
    pub create_session: Arc<CreatePaymentSessionHandler>,
    pub confirm_subscription: Arc<ConfirmSubscriptionHandler>,
    pub webhook: Arc<HandleWebhookHandler>,
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Webhook intake. The body is taken as raw bytes so signature verification
/// runs over exactly what was sent; any failure acknowledges with a 400 and
/// a plaintext reason so the sender schedules a redelivery.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Some(signature) = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
    else {
        return webhook_error("missing Stripe-Signature header");
    };

    match state.webhook.execute(&body, signature).await {
        Ok(_) => Json(WebhookAck { received: true }).into_response(),
        Err(e) => webhook_error(&e.to_string()),
    }
}

fn webhook_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        format!("Webhook Error: {message}"),
    )
        .into_response()
}

pub async fn create_payment_session(
    State(state): State<AppState>,
    Json(request): Json<CreatePaymentSessionRequest>,
) -> Response {
    let Some(price_id) = request.price_id.filter(|id| !id.is_empty()) else {
        return bad_request("Missing priceId");
    };

    match state
        .create_session
        .execute(price_id, request.customer_id)
        .await
    {
        Ok(url) => Json(CreatePaymentSessionResponse { url }).into_response(),
        Err(e) => internal_error(e.message),
    }
}

pub async fn confirm_subscription(
    State(state): State<AppState>,
    Json(request): Json<ConfirmSubscriptionRequest>,
) -> Response {
    let (Some(payment_intent_id), Some(customer_id), Some(price_id), Some(payment_method_id)) = (
        request.payment_intent_id.filter(|v| !v.is_empty()),
        request.customer_id.filter(|v| !v.is_empty()),
        request.price_id.filter(|v| !v.is_empty()),
        request.payment_method_id.filter(|v| !v.is_empty()),
    ) else {
        return bad_request("Missing required parameters");
    };

    let command = ConfirmSubscriptionCommand {
        payment_intent_id,
        customer_id,
        price_id,
        payment_method_id,
    };

    match state.confirm_subscription.execute(command).await {
        Ok(confirmation) => Json(ConfirmSubscriptionResponse {
            success: true,
            subscription_id: confirmation.subscription_id,
            status: confirmation.status.as_str().to_string(),
            current_period_end: confirmation
                .current_period_end
                .map(|dt| dt.to_rfc3339()),
            invoice_url: confirmation.invoice_url,
        })
        .into_response(),
        Err(e @ ConfirmSubscriptionError::PaymentNotCompleted(_)) => bad_request(&e.to_string()),
        Err(ConfirmSubscriptionError::Gateway(e)) => internal_error(e.message),
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn internal_error(message: String) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse { error: message }),
    )
        .into_response()
}
