//! Idempotent event reconciliation
//!
//! Applies a verified webhook event to the status projections. The channel
//! is at-least-once: deliveries repeat and can arrive out of order, so the
//! reconciler dedups by event id and relies on the store's no-regression
//! upsert for ordering. Applying the same event twice leaves the
//! projections exactly as applying it once.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::errors::WebhookError;
use super::event::{EventKind, InvoiceObject, SubscriptionObject, WebhookEvent};
use super::projection::{InvoiceProjection, SubscriptionProjection};
use super::status::InvoicePaymentStatus;
use crate::ports::projection_store::{ProjectionStore, SaveResult, UpsertResult};

/// Which projection an event touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Subscription,
    Invoice,
}

/// Result of reconciling one event.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// False for event types the relay does not act on
    pub handled: bool,
    pub entity: Option<EntityKind>,
    pub entity_id: Option<String>,
    pub new_status: Option<String>,
    /// True when the event id had already been processed
    pub duplicate: bool,
}

impl ReconcileOutcome {
    fn duplicate() -> Self {
        Self {
            handled: true,
            entity: None,
            entity_id: None,
            new_status: None,
            duplicate: true,
        }
    }

    fn ignored() -> Self {
        Self {
            handled: false,
            entity: None,
            entity_id: None,
            new_status: None,
            duplicate: false,
        }
    }

    fn applied(entity: EntityKind, entity_id: String, new_status: String) -> Self {
        Self {
            handled: true,
            entity: Some(entity),
            entity_id: Some(entity_id),
            new_status: Some(new_status),
            duplicate: false,
        }
    }
}

/// Projection update extracted from an event, ready to apply.
enum Update {
    Subscription(SubscriptionObject),
    Invoice(InvoiceObject, InvoicePaymentStatus),
}

/// Dispatches verified events to projection updates.
#[derive(Clone)]
pub struct Reconciler {
    store: Arc<dyn ProjectionStore>,
}

impl Reconciler {
    pub fn new(store: Arc<dyn ProjectionStore>) -> Self {
        Self { store }
    }

    pub async fn reconcile(&self, event: &WebhookEvent) -> Result<ReconcileOutcome, WebhookError> {
        // Classify and extract before claiming the event id: unrecognized
        // types and undecodable payloads must leave no dedup record, so a
        // later delivery of the same id is judged on its own merits.
        let update = match event.kind() {
            EventKind::SubscriptionCreated
            | EventKind::SubscriptionUpdated
            | EventKind::SubscriptionDeleted => {
                Update::Subscription(event.subscription_object()?)
            }
            EventKind::InvoicePaymentSucceeded => {
                Update::Invoice(event.invoice_object()?, InvoicePaymentStatus::Paid)
            }
            EventKind::InvoicePaymentFailed => {
                Update::Invoice(event.invoice_object()?, InvoicePaymentStatus::Failed)
            }
            EventKind::Unknown => {
                debug!(event_type = %event.event_type, "unhandled event type, acknowledging");
                return Ok(ReconcileOutcome::ignored());
            }
        };

        // Dedup by event id. Events without an id (test fixtures, partner
        // payloads) skip dedup and rely on the no-regression upsert alone.
        if !event.id.is_empty() {
            match self.store.record_event(&event.id, &event.event_type).await {
                Ok(SaveResult::AlreadyExists) => {
                    info!(event_id = %event.id, event_type = %event.event_type,
                        "duplicate delivery, acknowledging without reprocessing");
                    return Ok(ReconcileOutcome::duplicate());
                }
                Ok(SaveResult::Inserted) => {}
                Err(e) => {
                    // Processing without dedup is safe because the upsert
                    // guard makes replays value-level no-ops.
                    warn!(event_id = %event.id, error = %e,
                        "dedup store unavailable, processing without dedup");
                }
            }
        }

        let outcome = match update {
            Update::Subscription(object) => self.apply_subscription(event, object).await,
            Update::Invoice(object, status) => self.apply_invoice(event, object, status).await,
        };
        Ok(outcome)
    }

    async fn apply_subscription(
        &self,
        event: &WebhookEvent,
        object: SubscriptionObject,
    ) -> ReconcileOutcome {
        let status = object.status;
        let projection = SubscriptionProjection {
            subscription_id: object.id.clone(),
            status,
            current_period_end: object.current_period_end,
            observed_at: event.created,
        };

        match self.store.upsert_subscription(projection).await {
            Ok(UpsertResult::Applied) => {
                info!(subscription_id = %object.id, status = status.as_str(),
                    event_type = %event.event_type, "subscription projection updated");
            }
            Ok(UpsertResult::Stale) => {
                info!(subscription_id = %object.id, status = status.as_str(),
                    "stale delivery, projection unchanged");
            }
            Err(e) => {
                // Acknowledge anyway: failing here would trigger endless
                // redelivery of an event we already authenticated. The
                // projection is reconstructible from the provider.
                error!(subscription_id = %object.id, error = %e,
                    "projection write failed, event acknowledged without update");
            }
        }

        ReconcileOutcome::applied(
            EntityKind::Subscription,
            object.id,
            status.as_str().to_string(),
        )
    }

    async fn apply_invoice(
        &self,
        event: &WebhookEvent,
        object: InvoiceObject,
        status: InvoicePaymentStatus,
    ) -> ReconcileOutcome {
        let projection = InvoiceProjection {
            invoice_id: object.id.clone(),
            status,
            observed_at: event.created,
        };

        match self.store.upsert_invoice(projection).await {
            Ok(UpsertResult::Applied) => {
                info!(invoice_id = %object.id, status = status.as_str(),
                    event_type = %event.event_type, "invoice projection updated");
            }
            Ok(UpsertResult::Stale) => {
                info!(invoice_id = %object.id, status = status.as_str(),
                    "stale delivery, projection unchanged");
            }
            Err(e) => {
                error!(invoice_id = %object.id, error = %e,
                    "projection write failed, event acknowledged without update");
            }
        }

        ReconcileOutcome::applied(EntityKind::Invoice, object.id, status.as_str().to_string())
    }
}
