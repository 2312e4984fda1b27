//! Webhook signature verification
//!
//! Stripe signs each delivery with HMAC-SHA256 over `"{timestamp}.{body}"`
//! and sends the result in the `Stripe-Signature` header as
//! `t=<unix>,v1=<hex>[,v1=<hex>,...]`. Verification runs over the exact raw
//! request bytes before any JSON parsing, compares signatures in constant
//! time, and bounds the event age to limit replay.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::errors::WebhookError;
use super::event::WebhookEvent;

type HmacSha256 = Hmac<Sha256>;

/// Maximum accepted clock skew for events timestamped in the future.
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Default maximum accepted event age.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Parsed `Stripe-Signature` header.
#[derive(Debug, Clone)]
pub struct SignatureHeader {
    pub timestamp: i64,
    pub v1_signatures: Vec<String>,
}

impl SignatureHeader {
    /// Parse the comma-separated `key=value` header format.
    ///
    /// Unknown keys (including the legacy `v0` scheme) are ignored for
    /// forward compatibility; `t` and at least one `v1` are required.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let Some((key, value)) = part.trim().split_once('=') else {
                continue;
            };
            match key {
                "t" => {
                    timestamp = Some(
                        value
                            .parse::<i64>()
                            .map_err(|_| WebhookError::InvalidTimestamp)?,
                    );
                }
                "v1" => v1_signatures.push(value.to_string()),
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or(WebhookError::InvalidTimestamp)?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::MalformedHeader(
                "no v1 signature present".to_string(),
            ));
        }

        Ok(Self {
            timestamp,
            v1_signatures,
        })
    }
}

/// Verifies webhook deliveries against the endpoint's signing secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: SecretString,
    tolerance_secs: i64,
}

impl WebhookVerifier {
    pub fn new(secret: SecretString, tolerance_secs: i64) -> Self {
        Self {
            secret,
            tolerance_secs,
        }
    }

    /// Verify the signature over `payload` and decode the event envelope.
    ///
    /// Authentication runs first; the body is only parsed once the
    /// signature and timestamp have both checked out.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<WebhookEvent, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;
        self.validate_timestamp(header.timestamp)?;

        let expected = self.compute_signature(header.timestamp, payload);
        let verified = header.v1_signatures.iter().any(|candidate| {
            hex::decode(candidate)
                .map(|bytes| bytes.ct_eq(&expected).into())
                .unwrap_or(false)
        });
        if !verified {
            return Err(WebhookError::InvalidSignature);
        }

        serde_json::from_slice(payload)
            .map_err(|e| WebhookError::PayloadParse(e.to_string()))
    }

    fn validate_timestamp(&self, timestamp: i64) -> Result<(), WebhookError> {
        let now = chrono::Utc::now().timestamp();
        if timestamp > now + MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::TimestampOutOfRange);
        }
        if now - timestamp > self.tolerance_secs {
            return Err(WebhookError::TimestampOutOfRange);
        }
        Ok(())
    }

    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        mac.finalize().into_bytes().to_vec()
    }
}
