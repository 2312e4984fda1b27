//! Payment gateway port
//!
//! Abstracts the synchronous Stripe API calls the relay performs so that
//! application handlers can be tested against mocks and the concrete client
//! stays an adapter concern.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::status::SubscriptionStatus;

/// Request to create a hosted checkout session.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSession {
    pub price_id: String,
    pub customer_id: Option<String>,
    pub success_url: String,
    pub cancel_url: String,
}

/// A created checkout session; `url` is where the client is redirected.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

/// Status of a payment intent, mirroring Stripe's status strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentIntentStatus {
    RequiresPaymentMethod,
    RequiresConfirmation,
    RequiresAction,
    Processing,
    RequiresCapture,
    Canceled,
    Succeeded,
    #[serde(other)]
    Unknown,
}

impl PaymentIntentStatus {
    pub fn is_succeeded(&self) -> bool {
        matches!(self, PaymentIntentStatus::Succeeded)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentIntentStatus::RequiresPaymentMethod => "requires_payment_method",
            PaymentIntentStatus::RequiresConfirmation => "requires_confirmation",
            PaymentIntentStatus::RequiresAction => "requires_action",
            PaymentIntentStatus::Processing => "processing",
            PaymentIntentStatus::RequiresCapture => "requires_capture",
            PaymentIntentStatus::Canceled => "canceled",
            PaymentIntentStatus::Succeeded => "succeeded",
            PaymentIntentStatus::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub id: String,
    pub status: PaymentIntentStatus,
    pub customer_id: Option<String>,
}

/// Request to create a subscription from an already-collected payment method.
#[derive(Debug, Clone)]
pub struct CreateSubscription {
    pub customer_id: String,
    pub price_id: String,
    pub default_payment_method: String,
}

#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: String,
    pub status: SubscriptionStatus,
    /// Unix timestamp of the end of the current billing period
    pub current_period_end: Option<i64>,
    pub latest_invoice_url: Option<String>,
}

/// Error from a gateway call.
#[derive(Debug, Clone, Error)]
#[error("{code}: {message}")]
pub struct GatewayError {
    pub code: String,
    pub message: String,
    pub retryable: bool,
}

impl GatewayError {
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            code: "network_error".to_string(),
            message: message.into(),
            retryable: true,
        }
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self {
            code: "api_error".to_string(),
            message: message.into(),
            retryable: false,
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self {
            code: "parse_error".to_string(),
            message: message.into(),
            retryable: false,
        }
    }
}

/// Synchronous payment provider operations used by the relay.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutSession,
    ) -> Result<CheckoutSession, GatewayError>;

    async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<PaymentIntent, GatewayError>;

    /// Attach a payment method to a customer and make it the default for
    /// future invoices.
    async fn attach_payment_method(
        &self,
        payment_method_id: &str,
        customer_id: &str,
    ) -> Result<(), GatewayError>;

    async fn create_subscription(
        &self,
        request: CreateSubscription,
    ) -> Result<Subscription, GatewayError>;
}
