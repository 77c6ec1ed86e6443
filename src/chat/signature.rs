//! Webhook signature verification (`X-Line-Signature`).

use base64::{Engine, engine::general_purpose::STANDARD};
use ring::hmac::{self, Key};

/// Header carrying the base64 HMAC-SHA256 of the raw request body.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

/// HMAC key derived from the channel secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    key: Key,
}

impl WebhookVerifier {
    /// Verifier keyed with the channel secret.
    pub fn new(channel_secret: &str) -> Self {
        Self {
            key: Key::new(hmac::HMAC_SHA256, channel_secret.as_bytes()),
        }
    }

    /// Base64 signature the platform would send for `body`.
    pub fn sign(&self, body: &[u8]) -> String {
        STANDARD.encode(hmac::sign(&self.key, body).as_ref())
    }

    /// Whether `signature` matches `body`.
    pub fn verify(&self, body: &[u8], signature: &str) -> bool {
        let Ok(decoded) = STANDARD.decode(signature.trim()) else {
            return false;
        };
        hmac::verify(&self.key, body, &decoded).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_body_verifies() {
        let verifier = WebhookVerifier::new("channel-secret");
        let body = br#"{"events":[]}"#;
        let signature = verifier.sign(body);

        assert!(verifier.verify(body, &signature));
        assert!(!verifier.verify(br#"{"events":[{}]}"#, &signature));
    }

    #[test]
    fn foreign_or_malformed_signatures_fail() {
        let body = b"payload";
        let other = WebhookVerifier::new("other-secret").sign(body);
        let verifier = WebhookVerifier::new("channel-secret");

        assert!(!verifier.verify(body, &other));
        assert!(!verifier.verify(body, "not base64!"));
        assert!(!verifier.verify(body, ""));
    }
}
