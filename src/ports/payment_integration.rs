//! Payment integration port for the external billing provider.
//!
//! Covers what the subscription lifecycle needs from the provider:
//! the product catalogue, hosted checkout and the customer portal.
//! Webhooks travel the other way and are handled by the webhook pipeline.
//!
//! # Design
//!
//! - **Bounded**: implementations apply a per-request timeout
//! - **No retries**: transport failures surface as retryable errors and
//!   the caller decides

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::subscription::{BillingInterval, Plan, Subscription, SubscriptionError};

#[async_trait]
pub trait PaymentIntegration: Send + Sync {
    /// Creates a hosted checkout for the subscription and returns its URL.
    ///
    /// The subscription id travels as checkout custom data so webhooks can
    /// be correlated back to it.
    async fn checkout(
        &self,
        subscription: &Subscription,
        plan: &Plan,
        options: &CheckoutOptions,
    ) -> Result<String, PaymentError>;

    /// Every purchasable variant in the store.
    async fn plans(&self) -> Result<Vec<IntegrationProduct>, PaymentError>;

    /// URL of the provider-hosted portal for this subscription.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the subscription has no provider id yet
    async fn customer_portal_url(&self, subscription: &Subscription)
        -> Result<String, PaymentError>;
}

/// A purchasable product variant in the provider's catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationProduct {
    /// Variant id; becomes the plan's business key.
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Unit price in the currency's minor unit.
    pub price: i64,
    pub interval: Option<BillingInterval>,
}

// ════════════════════════════════════════════════════════════════════
// Checkout options
// ════════════════════════════════════════════════════════════════════

/// Extra information passed to checkout.
///
/// ```ignore
/// let options = CheckoutOptions::new()
///     .with_email("owner@example.com")
///     .with_skip_trial(true);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutOptions {
    options: BTreeMap<String, Value>,
}

impl CheckoutOptions {
    pub const EMAIL: &'static str = "email";
    pub const SKIP_TRIAL: &'static str = "skipTrial";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_email(self, email: impl Into<String>) -> Self {
        self.with_option(Self::EMAIL, Value::String(email.into()))
    }

    pub fn with_skip_trial(self, skip_trial: bool) -> Self {
        self.with_option(Self::SKIP_TRIAL, Value::Bool(skip_trial))
    }

    pub fn with_option(mut self, name: impl Into<String>, value: Value) -> Self {
        self.options.insert(name.into(), value);
        self
    }

    /// True when the option is set to a non-null value.
    pub fn has_option(&self, name: &str) -> bool {
        self.options.get(name).map_or(false, |v| !v.is_null())
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.options.get(name)
    }

    pub fn email(&self) -> Option<&str> {
        self.value(Self::EMAIL).and_then(Value::as_str)
    }

    pub fn skip_trial(&self) -> bool {
        self.value(Self::SKIP_TRIAL)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn as_map(&self) -> &BTreeMap<String, Value> {
        &self.options
    }
}

// ════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════

/// Failed call to the payment provider.
///
/// `retryable` starts from the code's default; adapters may override it.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{code}: {message}")]
pub struct PaymentError {
    pub code: PaymentErrorCode,
    pub message: String,
    /// HTTP status or provider error code, when there was one
    pub provider_code: Option<String>,
    pub retryable: bool,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_provider_code(self, provider_code: impl Into<String>) -> Self {
        Self {
            provider_code: Some(provider_code.into()),
            ..self
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::Timeout, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, format!("{} not found", resource))
    }

    /// Response did not have the expected shape.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidResponse, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl From<PaymentError> for SubscriptionError {
    fn from(err: PaymentError) -> Self {
        SubscriptionError::payment(err.to_string(), err.retryable)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    NetworkError,
    Timeout,
    /// API key rejected
    AuthenticationError,
    NotFound,
    /// HTTP 429
    RateLimitExceeded,
    InvalidResponse,
    ProviderError,
}

impl PaymentErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NetworkError => "network_error",
            Self::Timeout => "timeout",
            Self::AuthenticationError => "authentication_error",
            Self::NotFound => "not_found",
            Self::RateLimitExceeded => "rate_limit_exceeded",
            Self::InvalidResponse => "invalid_response",
            Self::ProviderError => "provider_error",
        }
    }

    /// Transport failures and throttling clear up on their own.
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::NetworkError | Self::Timeout | Self::RateLimitExceeded)
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payment_integration_is_object_safe() {
        fn _accepts_dyn(_integration: &dyn PaymentIntegration) {}
    }

    // ══════════════════════════════════════════════════════════════
    // Checkout options
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn options_builder_sets_known_options() {
        let options = CheckoutOptions::new()
            .with_email("owner@example.com")
            .with_skip_trial(true);

        assert_eq!(options.email(), Some("owner@example.com"));
        assert!(options.skip_trial());
        assert!(options.has_option(CheckoutOptions::EMAIL));
    }

    #[test]
    fn options_carry_arbitrary_values() {
        let options = CheckoutOptions::new()
            .with_option("discount_code", json!("LAUNCH"))
            .with_option("nothing", Value::Null);

        assert_eq!(options.value("discount_code"), Some(&json!("LAUNCH")));
        assert!(!options.has_option("nothing"));
        assert!(!options.has_option("missing"));
        assert!(!options.skip_trial());
    }

    // ══════════════════════════════════════════════════════════════
    // Errors
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn transport_errors_are_retryable() {
        assert!(PaymentError::network("connection reset").retryable);
        assert!(PaymentError::timeout("after 30s").retryable);
        assert!(!PaymentError::not_found("Subscription").retryable);
        assert!(!PaymentError::authentication("bad key").retryable);
    }

    #[test]
    fn display_prefixes_the_code() {
        let err = PaymentError::not_found("Subscription");
        assert_eq!(err.to_string(), "not_found: Subscription not found");
    }

    #[test]
    fn payment_error_keeps_retryability_in_subscription_error() {
        let err: SubscriptionError = PaymentError::timeout("slow").into();
        assert!(err.is_retryable());

        let err: SubscriptionError = PaymentError::provider("422").into();
        assert!(!err.is_retryable());
    }
}
