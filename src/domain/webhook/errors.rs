//! Webhook error types for LemonSqueezy webhook handling.
//!
//! Status codes drive the provider's retry behaviour:
//! - 401: signature problems, never retried
//! - 400: structurally broken payloads
//! - 406: well-formed payloads we refuse to apply
//! - 500: transient failures, retried by the provider

use http::StatusCode;
use thiserror::Error;

use crate::domain::foundation::{DomainError, SubscriptionId};
use crate::domain::subscription::SubscriptionError;

/// Errors that occur during webhook processing.
#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    /// No `X-Signature` header on the request.
    #[error("Invalid authentication token.")]
    MissingSignature,

    /// Signature does not match the HMAC of the body.
    #[error("Invalid authentication token.")]
    InvalidSignature,

    /// Body is not JSON or lacks `data`, `meta` or the correlation id.
    #[error("{0}")]
    MalformedPayload(String),

    /// Payload could not be mapped onto the provider's resource shape.
    #[error("Unable to parse payload: {0}")]
    ParseError(String),

    /// Event name we do not translate, or one that does not fit its payload.
    #[error("Unsupported event type: {0}")]
    UnsupportedEvent(String),

    #[error("Unsupported subscription status: {0}")]
    UnsupportedSubscriptionStatus(String),

    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    /// The correlation id does not resolve to a subscription.
    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(SubscriptionId),

    /// Repository, cache or lock failure.
    #[error("Infrastructure error: {0}")]
    Infrastructure(String),
}

impl WebhookError {
    /// The generic structural rejection message.
    pub fn missing_fields() -> Self {
        WebhookError::MalformedPayload(
            "Request payload does not contain required fields.".to_string(),
        )
    }

    /// Returns true if the provider should redeliver this webhook.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WebhookError::SubscriptionNotFound(_) | WebhookError::Infrastructure(_)
        )
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            WebhookError::MissingSignature | WebhookError::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }

            WebhookError::MalformedPayload(_) => StatusCode::BAD_REQUEST,

            WebhookError::ParseError(_)
            | WebhookError::UnsupportedEvent(_)
            | WebhookError::UnsupportedSubscriptionStatus(_)
            | WebhookError::InvalidTransition(_) => StatusCode::NOT_ACCEPTABLE,

            WebhookError::SubscriptionNotFound(_) | WebhookError::Infrastructure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        WebhookError::Infrastructure(err.to_string())
    }
}

impl From<SubscriptionError> for WebhookError {
    fn from(err: SubscriptionError) -> Self {
        match err {
            SubscriptionError::NotFound(id) => WebhookError::SubscriptionNotFound(id),
            SubscriptionError::InvalidTransition { .. } => {
                WebhookError::InvalidTransition(err.message())
            }
            other => WebhookError::Infrastructure(other.message()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::SubscriptionStatus;

    // ══════════════════════════════════════════════════════════════
    // Display
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn signature_errors_share_the_provider_facing_message() {
        assert_eq!(
            WebhookError::MissingSignature.to_string(),
            "Invalid authentication token."
        );
        assert_eq!(
            WebhookError::InvalidSignature.to_string(),
            "Invalid authentication token."
        );
    }

    #[test]
    fn missing_fields_message() {
        assert_eq!(
            WebhookError::missing_fields().to_string(),
            "Request payload does not contain required fields."
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Status codes
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn signature_failures_are_unauthorized() {
        assert_eq!(WebhookError::MissingSignature.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(WebhookError::InvalidSignature.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn structural_failures_are_bad_request() {
        assert_eq!(WebhookError::missing_fields().status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn semantic_rejections_are_not_acceptable() {
        for err in [
            WebhookError::ParseError("bad date".into()),
            WebhookError::UnsupportedEvent("order_created".into()),
            WebhookError::UnsupportedSubscriptionStatus("frozen".into()),
            WebhookError::InvalidTransition("expired -> active".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::NOT_ACCEPTABLE, "{}", err);
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn unknown_subscription_is_a_retryable_server_error() {
        let err = WebhookError::SubscriptionNotFound(SubscriptionId::new());
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_retryable());
    }

    // ══════════════════════════════════════════════════════════════
    // Conversions
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn subscription_not_found_keeps_the_id() {
        let id = SubscriptionId::new();
        let err: WebhookError = SubscriptionError::not_found(id).into();
        assert!(matches!(err, WebhookError::SubscriptionNotFound(found) if found == id));
    }

    #[test]
    fn invalid_transition_maps_to_not_acceptable() {
        let err: WebhookError = SubscriptionError::invalid_transition(
            SubscriptionStatus::Expired,
            SubscriptionStatus::Paused,
        )
        .into();
        assert_eq!(err.status_code(), StatusCode::NOT_ACCEPTABLE);
    }

    #[test]
    fn repository_failures_are_infrastructure() {
        let err: WebhookError = DomainError::database("connection reset").into();
        assert!(err.is_retryable());
    }
}
