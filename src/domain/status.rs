//! Subscription and invoice payment statuses

use serde::{Deserialize, Serialize};

/// Lifecycle status of a subscription, mirroring Stripe's status strings.
///
/// Unrecognized strings deserialize to `Unknown` so that new provider
/// statuses never break event intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    Incomplete,
    IncompleteExpired,
    Trialing,
    Active,
    PastDue,
    Canceled,
    Unpaid,
    Paused,
    #[serde(other)]
    Unknown,
}

impl SubscriptionStatus {
    /// Terminal statuses can never be replaced by a non-terminal one,
    /// regardless of event ordering.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SubscriptionStatus::Canceled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::IncompleteExpired => "incomplete_expired",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Unpaid => "unpaid",
            SubscriptionStatus::Paused => "paused",
            SubscriptionStatus::Unknown => "unknown",
        }
    }
}

/// Payment outcome recorded for an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoicePaymentStatus {
    Paid,
    Failed,
}

impl InvoicePaymentStatus {
    /// A paid invoice is settled; a later failure event for the same
    /// invoice is a redelivery artifact, not a real transition.
    pub fn is_settled(&self) -> bool {
        matches!(self, InvoicePaymentStatus::Paid)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoicePaymentStatus::Paid => "paid",
            InvoicePaymentStatus::Failed => "failed",
        }
    }
}
