//! Subscription repository port.
//!
//! # Example
//!
//! ```ignore
//! let subscription = repo
//!     .find_by_id(&id)
//!     .await?
//!     .ok_or_else(|| SubscriptionError::not_found(id))?;
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SubscriberId, SubscriptionId};
use crate::domain::subscription::Subscription;

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError>;

    /// Every subscription the subscriber ever held, oldest first.
    async fn find_by_subscriber(
        &self,
        subscriber: &SubscriberId,
    ) -> Result<Vec<Subscription>, DomainError>;

    /// Inserts or replaces the subscription by id.
    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError>;
}
