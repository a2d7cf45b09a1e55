//! Record of handled webhook deliveries.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::domain::foundation::{Timestamp, WebhookEventLogId};

/// How a delivery was acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebhookOutcome {
    /// Translated and applied.
    Processed,
    /// Valid but not something we act on.
    Ignored,
    /// Byte-identical redelivery of an already handled payload.
    Duplicate,
}

impl WebhookOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookOutcome::Processed => "processed",
            WebhookOutcome::Ignored => "ignored",
            WebhookOutcome::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for WebhookOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEventLogEntry {
    pub id: WebhookEventLogId,
    pub event_name: String,
    /// Hex SHA-256 of the raw body.
    pub payload_digest: String,
    pub outcome: WebhookOutcome,
    pub received_at: Timestamp,
}

impl WebhookEventLogEntry {
    pub fn new(
        event_name: impl Into<String>,
        payload_digest: impl Into<String>,
        outcome: WebhookOutcome,
    ) -> Self {
        Self {
            id: WebhookEventLogId::new(),
            event_name: event_name.into(),
            payload_digest: payload_digest.into(),
            outcome,
            received_at: Timestamp::now(),
        }
    }
}

/// Hex SHA-256 of a webhook body.
pub fn payload_digest(body: &[u8]) -> String {
    hex::encode(Sha256::digest(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_stable_hex_sha256() {
        assert_eq!(
            payload_digest(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(payload_digest(b"{}"), payload_digest(b"{}"));
        assert_ne!(payload_digest(b"{}"), payload_digest(b"{ }"));
    }

    #[test]
    fn outcome_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&WebhookOutcome::Duplicate).unwrap(),
            "\"duplicate\""
        );
    }
}
