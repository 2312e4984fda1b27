//! Stripe API wire types
//!
//! Only the response fields the relay reads are modeled.

use serde::Deserialize;

use crate::domain::status::SubscriptionStatus;
use crate::ports::payment_gateway::PaymentIntentStatus;

#[derive(Debug, Deserialize)]
pub struct CheckoutSessionResponse {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PaymentIntentResponse {
    pub id: String,
    pub status: PaymentIntentStatus,
    #[serde(default)]
    pub customer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionResponse {
    pub id: String,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub current_period_end: Option<i64>,
    /// Present as an object when requested with `expand[]=latest_invoice`
    #[serde(default)]
    pub latest_invoice: Option<ExpandedInvoice>,
}

#[derive(Debug, Deserialize)]
pub struct ExpandedInvoice {
    #[serde(default)]
    pub hosted_invoice_url: Option<String>,
}

/// Stripe error envelope: `{"error": {"message": ..., "type": ...}}`.
#[derive(Debug, Deserialize)]
pub struct StripeErrorResponse {
    pub error: StripeErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct StripeErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "type", default)]
    pub error_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_response_with_expanded_invoice() {
        let json = serde_json::json!({
            "id": "sub_1",
            "status": "active",
            "current_period_end": 1_702_000_000,
            "latest_invoice": {
                "id": "in_1",
                "hosted_invoice_url": "https://invoice.stripe.com/i/abc"
            }
        });
        let response: SubscriptionResponse = serde_json::from_value(json).unwrap();
        assert_eq!(response.status, SubscriptionStatus::Active);
        assert_eq!(
            response
                .latest_invoice
                .unwrap()
                .hosted_invoice_url
                .as_deref(),
            Some("https://invoice.stripe.com/i/abc")
        );
    }

    #[test]
    fn test_error_envelope_parses() {
        let json = serde_json::json!({
            "error": { "message": "No such price: price_x", "type": "invalid_request_error" }
        });
        let response: StripeErrorResponse = serde_json::from_value(json).unwrap();
        assert_eq!(
            response.error.message.as_deref(),
            Some("No such price: price_x")
        );
    }
}
