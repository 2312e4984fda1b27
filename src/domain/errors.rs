//! Webhook processing error taxonomy

use thiserror::Error;

/// Errors raised while verifying and processing a webhook delivery.
///
/// Every variant maps to HTTP 400 at the intake boundary so the sender
/// records the delivery as failed and redelivers later. Authentication
/// failures and malformed payloads are kept as distinct variants because
/// they are logged differently.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// No v1 signature matched the computed HMAC
    #[error("signature verification failed")]
    InvalidSignature,

    /// The `t=` component was absent or not an integer
    #[error("invalid signature timestamp")]
    InvalidTimestamp,

    /// The event timestamp is outside the accepted window
    #[error("signature timestamp outside tolerance")]
    TimestampOutOfRange,

    /// The signature header did not follow the `t=...,v1=...` format
    #[error("malformed signature header: {0}")]
    MalformedHeader(String),

    /// The body failed to decode after the signature checked out
    #[error("failed to parse event payload: {0}")]
    PayloadParse(String),
}

impl WebhookError {
    /// True when the failure concerns authentication rather than content.
    pub fn is_authentication_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::InvalidSignature
                | WebhookError::InvalidTimestamp
                | WebhookError::TimestampOutOfRange
                | WebhookError::MalformedHeader(_)
        )
    }

    /// Redelivery of the same bytes cannot succeed for any of these.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// HTTP status for the intake response.
    pub fn status_code(&self) -> u16 {
        400
    }
}
