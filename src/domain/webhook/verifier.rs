//! LemonSqueezy webhook signature verification.
//!
//! LemonSqueezy signs the raw request body with HMAC-SHA256 using the
//! webhook's signing secret and sends the hex digest in `X-Signature`.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the hex signature.
pub const SIGNATURE_HEADER: &str = "X-Signature";

/// Verifier for LemonSqueezy webhook signatures.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: SecretString,
}

impl WebhookVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Checks `signature` against the HMAC of `payload`.
    ///
    /// # Errors
    ///
    /// - `MissingSignature` - header absent or blank
    /// - `InvalidSignature` - not hex, or does not match
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> Result<(), WebhookError> {
        let signature = signature
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(WebhookError::MissingSignature)?;

        let provided = hex::decode(signature).map_err(|_| WebhookError::InvalidSignature)?;
        let expected = self.compute(payload)?;

        if !constant_time_compare(&expected, &provided) {
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    /// Hex signature LemonSqueezy would send for `payload`.
    pub fn sign(&self, payload: &[u8]) -> Result<String, WebhookError> {
        Ok(hex::encode(self.compute(payload)?))
    }

    fn compute(&self, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| WebhookError::InvalidSignature)?;
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Length check first; the byte comparison itself runs in constant time.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "lemon_test_secret";
    const PAYLOAD: &[u8] = br#"{"meta":{"event_name":"subscription_created"},"data":{}}"#;

    fn verifier() -> WebhookVerifier {
        WebhookVerifier::new(SecretString::new(TEST_SECRET.to_string()))
    }

    // ══════════════════════════════════════════════════════════════
    // Signature Verification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn valid_signature_is_accepted() {
        let v = verifier();
        let signature = v.sign(PAYLOAD).unwrap();

        assert!(v.verify(PAYLOAD, Some(&signature)).is_ok());
    }

    #[test]
    fn uppercase_hex_is_accepted() {
        let v = verifier();
        let signature = v.sign(PAYLOAD).unwrap().to_uppercase();

        assert!(v.verify(PAYLOAD, Some(&signature)).is_ok());
    }

    #[test]
    fn missing_signature_is_rejected() {
        assert!(matches!(
            verifier().verify(PAYLOAD, None),
            Err(WebhookError::MissingSignature)
        ));
        assert!(matches!(
            verifier().verify(PAYLOAD, Some("  ")),
            Err(WebhookError::MissingSignature)
        ));
    }

    #[test]
    fn non_hex_signature_is_rejected() {
        assert!(matches!(
            verifier().verify(PAYLOAD, Some("not-hex")),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let other = WebhookVerifier::new(SecretString::new("other".to_string()));
        let signature = other.sign(PAYLOAD).unwrap();

        assert!(matches!(
            verifier().verify(PAYLOAD, Some(&signature)),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let v = verifier();
        let signature = v.sign(PAYLOAD).unwrap();

        assert!(matches!(
            v.verify(br#"{"meta":{},"data":{"hacked":true}}"#, Some(&signature)),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn truncated_signature_is_rejected() {
        let v = verifier();
        let signature = v.sign(PAYLOAD).unwrap();

        assert!(matches!(
            v.verify(PAYLOAD, Some(&signature[..32])),
            Err(WebhookError::InvalidSignature)
        ));
    }

    #[test]
    fn debug_output_hides_secret() {
        assert!(!format!("{:?}", verifier()).contains(TEST_SECRET));
    }

    // ══════════════════════════════════════════════════════════════
    // Constant Time Compare Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn constant_time_compare_requires_equal_length() {
        assert!(constant_time_compare(b"abc", b"abc"));
        assert!(!constant_time_compare(b"abc", b"abcd"));
        assert!(!constant_time_compare(b"abc", b"abd"));
    }
}
