//! In-memory adapters.
//!
//! Backed by `tokio::sync::RwLock`-guarded collections. Used by the test
//! suite and by single-process deployments; nothing survives a restart.

mod feature_cache;
mod plan_feature_repository;
mod plan_repository;
mod subscription_repository;
mod webhook_event_log;

pub use feature_cache::InMemoryFeatureCache;
pub use plan_feature_repository::InMemoryPlanFeatureRepository;
pub use plan_repository::InMemoryPlanRepository;
pub use subscription_repository::InMemorySubscriptionRepository;
pub use webhook_event_log::InMemoryWebhookEventLog;
