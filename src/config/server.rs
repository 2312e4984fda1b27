//! HTTP listener configuration

use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;

use super::error::ValidationError;

/// Listener settings for the relay's HTTP surface.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// IP address to bind, e.g. `0.0.0.0` or `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Filter directive handed to the tracing subscriber
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Per-request timeout; on webhook timeouts the provider redelivers
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Comma-separated allowed CORS origins; unset means permissive
    pub cors_origins: Option<String>,
}

impl ServerConfig {
    /// Resolve the bind address. `host` must be a literal IP so that a
    /// typo fails configuration loading rather than the bind call.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ValidationError::InvalidHost)?;
        Ok(SocketAddr::from((ip, self.port)))
    }

    pub fn cors_origins_list(&self) -> Vec<String> {
        self.cors_origins
            .as_ref()
            .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        self.socket_addr()?;
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
            cors_origins: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4242
}

fn default_log_level() -> String {
    "info,payment_relay=debug".to_string()
}

fn default_request_timeout() -> u64 {
    15
}
