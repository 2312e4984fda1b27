//! Confirm a subscription from a completed payment intent
//!
//! The client collects payment out of band and then calls this to turn the
//! succeeded payment intent into a subscription: verify the intent, attach
//! the payment method as the customer's default, create the subscription.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;

use crate::domain::status::SubscriptionStatus;
use crate::ports::payment_gateway::{CreateSubscription, GatewayError, PaymentGateway};

#[derive(Debug, Clone)]
pub struct ConfirmSubscriptionCommand {
    pub payment_intent_id: String,
    pub customer_id: String,
    pub price_id: String,
    pub payment_method_id: String,
}

/// Result returned to the client after a successful confirmation.
#[derive(Debug, Clone)]
pub struct SubscriptionConfirmation {
    pub subscription_id: String,
    pub status: SubscriptionStatus,
    pub current_period_end: Option<DateTime<Utc>>,
    pub invoice_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfirmSubscriptionError {
    /// The payment intent has not reached `succeeded`; no subscription
    /// is created.
    #[error("Payment not completed. Status: {0}")]
    PaymentNotCompleted(String),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

pub struct ConfirmSubscriptionHandler {
    gateway: Arc<dyn PaymentGateway>,
}

impl ConfirmSubscriptionHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { gateway }
    }

    pub async fn execute(
        &self,
        command: ConfirmSubscriptionCommand,
    ) -> Result<SubscriptionConfirmation, ConfirmSubscriptionError> {
        let intent = self
            .gateway
            .retrieve_payment_intent(&command.payment_intent_id)
            .await?;

        if !intent.status.is_succeeded() {
            return Err(ConfirmSubscriptionError::PaymentNotCompleted(
                intent.status.as_str().to_string(),
            ));
        }

        self.gateway
            .attach_payment_method(&command.payment_method_id, &command.customer_id)
            .await?;

        let subscription = self
            .gateway
            .create_subscription(CreateSubscription {
                customer_id: command.customer_id,
                price_id: command.price_id,
                default_payment_method: command.payment_method_id,
            })
            .await?;

        info!(
            subscription_id = %subscription.id,
            status = subscription.status.as_str(),
            "subscription confirmed"
        );

        Ok(SubscriptionConfirmation {
            subscription_id: subscription.id,
            status: subscription.status,
            current_period_end: subscription
                .current_period_end
                .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
            invoice_url: subscription.latest_invoice_url,
        })
    }
}
