//! Payment provider configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Stripe configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key (sk_test_... or sk_live_...)
    pub stripe_api_key: SecretString,

    /// Stripe webhook signing secret (whsec_...)
    pub stripe_webhook_secret: SecretString,

    /// Redirect URL after a completed checkout
    pub success_url: String,

    /// Redirect URL after an abandoned checkout
    pub cancel_url: String,

    /// Maximum accepted age of a webhook event, in seconds
    #[serde(default = "default_webhook_tolerance")]
    pub webhook_tolerance_secs: i64,
}

impl PaymentConfig {
    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let api_key = self.stripe_api_key.expose_secret();
        if api_key.is_empty() {
            return Err(ValidationError::MissingRequired("stripe_api_key"));
        }
        if !api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }

        let webhook_secret = self.stripe_webhook_secret.expose_secret();
        if webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("stripe_webhook_secret"));
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        if !is_http_url(&self.success_url) {
            return Err(ValidationError::InvalidRedirectUrl("success_url"));
        }
        if !is_http_url(&self.cancel_url) {
            return Err(ValidationError::InvalidRedirectUrl("cancel_url"));
        }

        if self.webhook_tolerance_secs <= 0 {
            return Err(ValidationError::InvalidWebhookTolerance);
        }

        Ok(())
    }

    /// Check if using test mode keys
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn default_webhook_tolerance() -> i64 {
    300
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> PaymentConfig {
        PaymentConfig {
            stripe_api_key: SecretString::new("sk_test_abc123".to_string()),
            stripe_webhook_secret: SecretString::new("whsec_test456".to_string()),
            success_url: "https://app.example.com/payment/success".to_string(),
            cancel_url: "https://app.example.com/payment/cancel".to_string(),
            webhook_tolerance_secs: 300,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_invalid_api_key_prefix() {
        let mut config = test_config();
        config.stripe_api_key = SecretString::new("pk_test_wrong".to_string());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidStripeKey)
        ));
    }

    #[test]
    fn test_empty_api_key() {
        let mut config = test_config();
        config.stripe_api_key = SecretString::new(String::new());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("stripe_api_key"))
        ));
    }

    #[test]
    fn test_invalid_webhook_secret_prefix() {
        let mut config = test_config();
        config.stripe_webhook_secret = SecretString::new("sk_not_a_webhook_secret".to_string());
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidStripeWebhookSecret)
        ));
    }

    #[test]
    fn test_invalid_redirect_url() {
        let mut config = test_config();
        config.success_url = "app.example.com/success".to_string();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidRedirectUrl("success_url"))
        ));
    }

    #[test]
    fn test_invalid_tolerance() {
        let mut config = test_config();
        config.webhook_tolerance_secs = 0;
        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidWebhookTolerance)
        ));
    }

    #[test]
    fn test_test_mode_detection() {
        let config = test_config();
        assert!(config.is_test_mode());

        let mut live = test_config();
        live.stripe_api_key = SecretString::new("sk_live_real".to_string());
        assert!(!live.is_test_mode());
    }

    #[test]
    fn test_secret_not_exposed_in_debug() {
        let config = test_config();
        let debug_output = format!("{:?}", config);
        assert!(!debug_output.contains("sk_test_abc123"));
        assert!(!debug_output.contains("whsec_test456"));
    }
}
