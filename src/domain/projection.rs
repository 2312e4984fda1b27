//! Status projections and the no-regression transition rule
//!
//! The relay maintains a latest-known-status projection per subscription and
//! per invoice. Deliveries arrive at least once and possibly out of order,
//! so a write only lands if it does not move the projection backwards.

use serde::{Deserialize, Serialize};

use super::status::{InvoicePaymentStatus, SubscriptionStatus};

/// Latest observed state of a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionProjection {
    pub subscription_id: String,
    pub status: SubscriptionStatus,
    /// Unix timestamp of the end of the current billing period
    pub current_period_end: Option<i64>,
    /// `created` timestamp of the event this state was observed from
    pub observed_at: i64,
}

impl SubscriptionProjection {
    /// Whether this (incoming) state may replace `existing`.
    ///
    /// Rejected when the existing status is terminal and the incoming one is
    /// not, or when the incoming observation is strictly older. Events with
    /// equal timestamps are accepted so a redelivered event stays a no-op at
    /// the value level rather than being reported as a conflict.
    pub fn supersedes(&self, existing: &SubscriptionProjection) -> bool {
        if existing.status.is_terminal() && !self.status.is_terminal() {
            return false;
        }
        self.observed_at >= existing.observed_at
    }
}

/// Latest observed payment outcome of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceProjection {
    pub invoice_id: String,
    pub status: InvoicePaymentStatus,
    pub observed_at: i64,
}

impl InvoiceProjection {
    /// Same ordering rule as subscriptions; a settled invoice never
    /// reverts to failed.
    pub fn supersedes(&self, existing: &InvoiceProjection) -> bool {
        if existing.status.is_settled() && !self.status.is_settled() {
            return false;
        }
        self.observed_at >= existing.observed_at
    }
}
