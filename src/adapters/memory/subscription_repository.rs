//! In-memory subscription repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, SubscriberId, SubscriptionId};
use crate::domain::subscription::Subscription;
use crate::ports::SubscriptionRepository;

#[derive(Debug, Default, Clone)]
pub struct InMemorySubscriptionRepository {
    subscriptions: Arc<RwLock<HashMap<SubscriptionId, Subscription>>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.subscriptions.read().await.len()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, DomainError> {
        Ok(self.subscriptions.read().await.get(id).cloned())
    }

    async fn find_by_subscriber(
        &self,
        subscriber: &SubscriberId,
    ) -> Result<Vec<Subscription>, DomainError> {
        let mut found: Vec<Subscription> = self
            .subscriptions
            .read()
            .await
            .values()
            .filter(|s| s.subscriber == *subscriber)
            .cloned()
            .collect();
        found.sort_by_key(|s| s.created_at);
        Ok(found)
    }

    async fn save(&self, subscription: &Subscription) -> Result<(), DomainError> {
        self.subscriptions
            .write()
            .await
            .insert(subscription.id, subscription.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::PlanId;

    #[tokio::test]
    async fn save_replaces_by_id() {
        let repo = InMemorySubscriptionRepository::new();
        let mut sub = Subscription::new_pending(SubscriberId::new("acme").unwrap(), PlanId::new());
        repo.save(&sub).await.unwrap();

        sub.set_external_id("1");
        repo.save(&sub).await.unwrap();

        assert_eq!(repo.len().await, 1);
        let stored = repo.find_by_id(&sub.id).await.unwrap().unwrap();
        assert_eq!(stored.external_subscription_id.as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn find_by_subscriber_filters() {
        let repo = InMemorySubscriptionRepository::new();
        let acme = SubscriberId::new("acme").unwrap();
        repo.save(&Subscription::new_pending(acme.clone(), PlanId::new()))
            .await
            .unwrap();
        repo.save(&Subscription::new_pending(
            SubscriberId::new("globex").unwrap(),
            PlanId::new(),
        ))
        .await
        .unwrap();

        assert_eq!(repo.find_by_subscriber(&acme).await.unwrap().len(), 1);
    }
}
