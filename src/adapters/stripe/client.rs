//! Stripe HTTP client
//!
//! Implements the [`PaymentGateway`] port against the Stripe REST API.
//! Requests are form-encoded with HTTP basic auth carrying the secret key,
//! as the API expects. Non-2xx responses surface the error message from
//! Stripe's error envelope where available.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use super::types::{
    CheckoutSessionResponse, PaymentIntentResponse, StripeErrorResponse, SubscriptionResponse,
};
use crate::ports::payment_gateway::{
    CheckoutSession, CreateCheckoutSession, CreateSubscription, GatewayError, PaymentGateway,
    PaymentIntent, Subscription,
};

const STRIPE_API_BASE: &str = "https://api.stripe.com";

/// Connection settings for the Stripe client.
#[derive(Clone)]
pub struct StripeConfig {
    pub api_key: SecretString,
    pub base_url: String,
}

impl StripeConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            base_url: STRIPE_API_BASE.to_string(),
        }
    }

    /// Point the client at a different base URL (stub server in tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

pub struct StripeGateway {
    client: reqwest::Client,
    config: StripeConfig,
}

impl StripeGateway {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn post_form<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        form: &[(String, String)],
    ) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(path, "stripe request");

        let response = self
            .client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), None::<&str>)
            .form(form)
            .send()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        Self::read_response(response).await
    }

    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(path, "stripe request");

        let response = self
            .client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), None::<&str>)
            .send()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        Self::read_response(response).await
    }

    async fn read_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GatewayError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<StripeErrorResponse>(&body)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or(body);
            return Err(GatewayError::api(message));
        }

        serde_json::from_str(&body).map_err(|e| GatewayError::parse(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutSession,
    ) -> Result<CheckoutSession, GatewayError> {
        let mut form = vec![
            ("mode".to_string(), "subscription".to_string()),
            ("line_items[0][price]".to_string(), request.price_id),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
            ("success_url".to_string(), request.success_url),
            ("cancel_url".to_string(), request.cancel_url),
        ];
        if let Some(customer_id) = request.customer_id {
            form.push(("customer".to_string(), customer_id));
        }

        let session: CheckoutSessionResponse =
            self.post_form("/v1/checkout/sessions", &form).await?;
        let url = session
            .url
            .ok_or_else(|| GatewayError::parse("checkout session has no url"))?;

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }

    async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<PaymentIntent, GatewayError> {
        let intent: PaymentIntentResponse = self
            .get(&format!("/v1/payment_intents/{payment_intent_id}"))
            .await?;

        Ok(PaymentIntent {
            id: intent.id,
            status: intent.status,
            customer_id: intent.customer,
        })
    }

    async fn attach_payment_method(
        &self,
        payment_method_id: &str,
        customer_id: &str,
    ) -> Result<(), GatewayError> {
        let form = vec![("customer".to_string(), customer_id.to_string())];
        let _: serde_json::Value = self
            .post_form(&format!("/v1/payment_methods/{payment_method_id}/attach"), &form)
            .await?;

        // Make it the default so the subscription's invoices can charge it.
        let form = vec![(
            "invoice_settings[default_payment_method]".to_string(),
            payment_method_id.to_string(),
        )];
        let _: serde_json::Value = self
            .post_form(&format!("/v1/customers/{customer_id}"), &form)
            .await?;

        Ok(())
    }

    async fn create_subscription(
        &self,
        request: CreateSubscription,
    ) -> Result<Subscription, GatewayError> {
        let form = vec![
            ("customer".to_string(), request.customer_id),
            ("items[0][price]".to_string(), request.price_id),
            (
                "default_payment_method".to_string(),
                request.default_payment_method,
            ),
            ("expand[]".to_string(), "latest_invoice".to_string()),
        ];

        let subscription: SubscriptionResponse =
            self.post_form("/v1/subscriptions", &form).await?;

        Ok(Subscription {
            id: subscription.id,
            status: subscription.status,
            current_period_end: subscription.current_period_end,
            latest_invoice_url: subscription
                .latest_invoice
                .and_then(|invoice| invoice.hosted_invoice_url),
        })
    }
}
