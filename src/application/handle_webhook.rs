//! Webhook intake use case
//!
//! Verifies the delivery signature over the raw bytes and hands the decoded
//! event to the reconciler.

use tracing::{info, warn};

use crate::domain::errors::WebhookError;
use crate::domain::reconciler::{ReconcileOutcome, Reconciler};
use crate::domain::verifier::WebhookVerifier;

pub struct HandleWebhookHandler {
    verifier: WebhookVerifier,
    reconciler: Reconciler,
}

impl HandleWebhookHandler {
    pub fn new(verifier: WebhookVerifier, reconciler: Reconciler) -> Self {
        Self {
            verifier,
            reconciler,
        }
    }

    pub async fn execute(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<ReconcileOutcome, WebhookError> {
        let event = match self.verifier.verify_and_parse(payload, signature_header) {
            Ok(event) => event,
            Err(e) => {
                if e.is_authentication_failure() {
                    warn!(error = %e, "webhook delivery failed authentication");
                } else {
                    warn!(error = %e, "webhook payload rejected");
                }
                return Err(e);
            }
        };

        info!(event_id = %event.id, event_type = %event.event_type, "webhook verified");
        self.reconciler.reconcile(&event).await
    }
}
