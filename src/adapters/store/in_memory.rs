//! In-memory projection store
//!
//! Reference implementation of the [`ProjectionStore`] port backed by
//! `tokio::sync::RwLock` maps. The supersedes check runs inside the write
//! lock, so concurrent deliveries for the same entity are serialized and
//! the no-regression rule holds under contention.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::projection::{InvoiceProjection, SubscriptionProjection};
use crate::ports::projection_store::{ProjectionStore, SaveResult, StoreError, UpsertResult};

#[derive(Default)]
pub struct InMemoryProjectionStore {
    processed_events: RwLock<HashMap<String, String>>,
    subscriptions: RwLock<HashMap<String, SubscriptionProjection>>,
    invoices: RwLock<HashMap<String, InvoiceProjection>>,
}

impl InMemoryProjectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct event ids recorded, for tests and diagnostics.
    pub async fn processed_event_count(&self) -> usize {
        self.processed_events.read().await.len()
    }
}

#[async_trait]
impl ProjectionStore for InMemoryProjectionStore {
    async fn record_event(
        &self,
        event_id: &str,
        event_type: &str,
    ) -> Result<SaveResult, StoreError> {
        let mut events = self.processed_events.write().await;
        if events.contains_key(event_id) {
            return Ok(SaveResult::AlreadyExists);
        }
        events.insert(event_id.to_string(), event_type.to_string());
        Ok(SaveResult::Inserted)
    }

    async fn upsert_subscription(
        &self,
        projection: SubscriptionProjection,
    ) -> Result<UpsertResult, StoreError> {
        let mut subscriptions = self.subscriptions.write().await;
        if let Some(existing) = subscriptions.get(&projection.subscription_id) {
            if !projection.supersedes(existing) {
                return Ok(UpsertResult::Stale);
            }
        }
        subscriptions.insert(projection.subscription_id.clone(), projection);
        Ok(UpsertResult::Applied)
    }

    async fn upsert_invoice(
        &self,
        projection: InvoiceProjection,
    ) -> Result<UpsertResult, StoreError> {
        let mut invoices = self.invoices.write().await;
        if let Some(existing) = invoices.get(&projection.invoice_id) {
            if !projection.supersedes(existing) {
                return Ok(UpsertResult::Stale);
            }
        }
        invoices.insert(projection.invoice_id.clone(), projection);
        Ok(UpsertResult::Applied)
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<SubscriptionProjection>, StoreError> {
        Ok(self.subscriptions.read().await.get(subscription_id).cloned())
    }

    async fn get_invoice(&self, invoice_id: &str) -> Result<Option<InvoiceProjection>, StoreError> {
        Ok(self.invoices.read().await.get(invoice_id).cloned())
    }
}
