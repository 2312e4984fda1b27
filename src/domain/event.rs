//! Webhook event envelope and typed payload extraction

use serde::Deserialize;

use super::errors::WebhookError;
use super::status::SubscriptionStatus;

/// A verified webhook event as delivered by Stripe.
///
/// Only the envelope fields the relay acts on are modeled; the payload
/// object stays as raw JSON until a handler extracts a typed view of it.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Provider-assigned event id (`evt_...`), used for deduplication
    #[serde(default)]
    pub id: String,

    /// Dotted event type string, e.g. `customer.subscription.updated`
    #[serde(rename = "type")]
    pub event_type: String,

    /// Unix timestamp at which the provider created the event
    #[serde(default)]
    pub created: i64,

    pub data: EventData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventData {
    pub object: serde_json::Value,
}

/// The closed set of event types the relay acts on.
///
/// Everything else is `Unknown` and acknowledged without side effects;
/// dispatch is an exhaustive match so a newly handled type cannot be
/// added without deciding its reconciliation behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    SubscriptionCreated,
    SubscriptionUpdated,
    SubscriptionDeleted,
    InvoicePaymentSucceeded,
    InvoicePaymentFailed,
    Unknown,
}

impl EventKind {
    pub fn from_type_str(event_type: &str) -> Self {
        match event_type {
            "customer.subscription.created" => EventKind::SubscriptionCreated,
            "customer.subscription.updated" => EventKind::SubscriptionUpdated,
            "customer.subscription.deleted" => EventKind::SubscriptionDeleted,
            "invoice.payment_succeeded" => EventKind::InvoicePaymentSucceeded,
            "invoice.payment_failed" => EventKind::InvoicePaymentFailed,
            _ => EventKind::Unknown,
        }
    }
}

impl WebhookEvent {
    pub fn kind(&self) -> EventKind {
        EventKind::from_type_str(&self.event_type)
    }

    /// Extract the subscription payload for subscription lifecycle events.
    pub fn subscription_object(&self) -> Result<SubscriptionObject, WebhookError> {
        serde_json::from_value(self.data.object.clone())
            .map_err(|e| WebhookError::PayloadParse(format!("subscription object: {e}")))
    }

    /// Extract the invoice payload for invoice payment events.
    pub fn invoice_object(&self) -> Result<InvoiceObject, WebhookError> {
        serde_json::from_value(self.data.object.clone())
            .map_err(|e| WebhookError::PayloadParse(format!("invoice object: {e}")))
    }
}

/// Typed view of a subscription payload.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionObject {
    pub id: String,
    pub status: SubscriptionStatus,
    #[serde(default)]
    pub current_period_end: Option<i64>,
}

/// Typed view of an invoice payload.
#[derive(Debug, Clone, Deserialize)]
pub struct InvoiceObject {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub subscription: Option<String>,
}
