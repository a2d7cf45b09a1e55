//! Resolves a subscriber's current subscription.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SubscriberId};
use crate::domain::subscription::Subscription;

/// Source of "which subscription applies to this subscriber right now".
///
/// Returns `None` for subscribers without a subscription (e.g. free tier).
#[async_trait]
pub trait SubscriptionProvider: Send + Sync {
    async fn get_subscription_for(
        &self,
        subscriber: &SubscriberId,
    ) -> Result<Option<Subscription>, DomainError>;
}
