//! Application configuration
//!
//! Loads typed configuration from environment variables (with `.env` support
//! for local development). Variables use the `PAY_RELAY` prefix with `__` as
//! the section separator, e.g. `PAY_RELAY__SERVER__PORT=4242` or
//! `PAY_RELAY__PAYMENT__STRIPE_API_KEY=sk_test_...`.

mod error;
mod payment;
mod server;

pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::ServerConfig;

use serde::Deserialize;

/// Top-level application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env if present; ignore absence in deployed environments
        let _ = dotenvy::dotenv();

        let config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("PAY_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration sections
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        Ok(())
    }
}
