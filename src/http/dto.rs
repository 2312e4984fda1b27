//! Wire DTOs
//!
//! Request and response bodies use camelCase field names on the wire.
//! Request fields are optional at the serde level so that missing values
//! produce the documented 400 responses instead of extractor rejections.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentSessionRequest {
    pub price_id: Option<String>,
    pub customer_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatePaymentSessionResponse {
    pub url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmSubscriptionRequest {
    pub payment_intent_id: Option<String>,
    pub customer_id: Option<String>,
    pub price_id: Option<String>,
    pub payment_method_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmSubscriptionResponse {
    pub success: bool,
    pub subscription_id: String,
    pub status: String,
    /// ISO-8601 timestamp, or null when the provider omitted the period end
    pub current_period_end: Option<String>,
    pub invoice_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
