//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `memory` - In-memory repositories, cache and webhook log
//! - `redis` - Redis feature cache
//! - `lemon_squeezy` - LemonSqueezy API client and a test double
//! - `http` - Axum webhook route

pub mod http;
pub mod lemon_squeezy;
pub mod memory;
pub mod redis;

pub use http::{webhook_router, WebhookAppState};
pub use lemon_squeezy::{LemonSqueezyClient, LemonSqueezyConfig, MockPaymentIntegration};
pub use memory::{
    InMemoryFeatureCache, InMemoryPlanFeatureRepository, InMemoryPlanRepository,
    InMemorySubscriptionRepository, InMemoryWebhookEventLog,
};
pub use self::redis::RedisFeatureCache;
