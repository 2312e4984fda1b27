//! Projection store port
//!
//! Persistence boundary for processed-event deduplication and status
//! projections. The crate ships an in-memory reference implementation;
//! durable backends plug in behind this trait.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::projection::{InvoiceProjection, SubscriptionProjection};

/// Outcome of recording a processed event id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// First time this event id was seen
    Inserted,
    /// Another delivery of the same event already claimed the id
    AlreadyExists,
}

/// Outcome of a projection upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertResult {
    /// The projection now reflects the given state
    Applied,
    /// The write was rejected by the no-regression rule
    Stale,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store backend unavailable: {0}")]
    Unavailable(String),

    #[error("store operation failed: {0}")]
    Backend(String),
}

/// Storage for event dedup records and status projections.
///
/// `record_event` must be first-writer-wins: exactly one of two concurrent
/// calls with the same id observes `Inserted`. Upserts must apply the
/// projection's `supersedes` check atomically with the write.
#[async_trait]
pub trait ProjectionStore: Send + Sync {
    async fn record_event(&self, event_id: &str, event_type: &str)
        -> Result<SaveResult, StoreError>;

    async fn upsert_subscription(
        &self,
        projection: SubscriptionProjection,
    ) -> Result<UpsertResult, StoreError>;

    async fn upsert_invoice(&self, projection: InvoiceProjection)
        -> Result<UpsertResult, StoreError>;

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Option<SubscriptionProjection>, StoreError>;

    async fn get_invoice(&self, invoice_id: &str) -> Result<Option<InvoiceProjection>, StoreError>;
}
