//! Create a hosted checkout session

use std::sync::Arc;

use tracing::info;

use crate::ports::payment_gateway::{CreateCheckoutSession, GatewayError, PaymentGateway};

/// Redirect URLs applied to every checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutUrls {
    pub success_url: String,
    pub cancel_url: String,
}

pub struct CreatePaymentSessionHandler {
    gateway: Arc<dyn PaymentGateway>,
    urls: CheckoutUrls,
}

impl CreatePaymentSessionHandler {
    pub fn new(gateway: Arc<dyn PaymentGateway>, urls: CheckoutUrls) -> Self {
        Self { gateway, urls }
    }

    /// Create a subscription-mode checkout session and return the hosted
    /// payment page URL.
    pub async fn execute(
        &self,
        price_id: String,
        customer_id: Option<String>,
    ) -> Result<String, GatewayError> {
        let session = self
            .gateway
            .create_checkout_session(CreateCheckoutSession {
                price_id,
                customer_id,
                success_url: self.urls.success_url.clone(),
                cancel_url: self.urls.cancel_url.clone(),
            })
            .await?;

        info!(session_id = %session.id, "checkout session created");
        Ok(session.url)
    }
}
