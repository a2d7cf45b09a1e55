//! Application layer - Managers and handlers.
//!
//! Orchestrates domain operations over the ports:
//!
//! - `PlanFeatureManager` - Effective feature values per plan and subscriber
//! - `PlanFeatureToggle` / `PlanFeatureVoter` - Subscriber-facing checks
//! - `SubscriptionManager` - Subscription lifecycle and provider hand-offs
//! - `PlanCatalogSync` - Provider catalogue into the plan repository
//! - `SubscriptionEventSubscriber` - Billing events into state transitions
//! - `WebhookPipeline` - Signed deliveries in, outcomes out

mod catalog_sync;
mod feature_toggle;
mod feature_voter;
mod plan_feature_manager;
mod subscription_event_subscriber;
mod subscription_manager;
mod webhook_pipeline;

pub use catalog_sync::{PlanCatalogSync, SyncReport};
pub use feature_toggle::PlanFeatureToggle;
pub use feature_voter::{PlanFeatureVoter, Vote, VoteSubject, ATTRIBUTE_PREFIX};
pub use plan_feature_manager::PlanFeatureManager;
pub use subscription_event_subscriber::SubscriptionEventSubscriber;
pub use subscription_manager::SubscriptionManager;
pub use webhook_pipeline::{HandleWebhookCommand, SubscriptionLocks, WebhookPipeline};
