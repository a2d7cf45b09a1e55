//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Feature Ports
//!
//! - `FeatureCache` - Read-through cache for resolved feature values
//! - `PlanFeatureRepository` - Per-plan feature overrides
//! - `FeatureToggle` - Subscriber-facing entitlement checks
//!
//! ## Subscription Ports
//!
//! - `PlanRepository` / `SubscriptionRepository` - Persistence
//! - `SubscriptionProvider` - Current subscription of a subscriber
//! - `PaymentIntegration` - Catalogue, checkout and portal at the provider
//!
//! ## Webhook Ports
//!
//! - `WebhookEventLog` - Handled deliveries, for redelivery detection

mod feature_cache;
mod feature_toggle;
mod payment_integration;
mod plan_feature_repository;
mod plan_repository;
mod subscription_provider;
mod subscription_repository;
mod webhook_event_log;

pub use feature_cache::{feature_cache_key, key_matches, plan_cache_pattern, FeatureCache};
pub use feature_toggle::FeatureToggle;
pub use payment_integration::{
    CheckoutOptions, IntegrationProduct, PaymentError, PaymentErrorCode, PaymentIntegration,
};
pub use plan_feature_repository::PlanFeatureRepository;
pub use plan_repository::PlanRepository;
pub use subscription_provider::SubscriptionProvider;
pub use subscription_repository::SubscriptionRepository;
pub use webhook_event_log::WebhookEventLog;
