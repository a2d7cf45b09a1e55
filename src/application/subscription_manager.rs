//! SubscriptionManager - Subscription lifecycle and provider hand-offs.
//!
//! Every transition goes through the aggregate's state machine and is
//! persisted only when it changed something.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, SubscriberId, Timestamp};
use crate::domain::subscription::{Plan, PlanRef, Subscription, SubscriptionError};
use crate::ports::{
    CheckoutOptions, PaymentIntegration, PlanRepository, SubscriptionProvider,
    SubscriptionRepository,
};

pub struct SubscriptionManager {
    subscriptions: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanRepository>,
    payment: Arc<dyn PaymentIntegration>,
}

impl SubscriptionManager {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        plans: Arc<dyn PlanRepository>,
        payment: Arc<dyn PaymentIntegration>,
    ) -> Self {
        Self {
            subscriptions,
            plans,
            payment,
        }
    }

    /// Current subscription: the non-expired one if any, else the most recent.
    pub async fn get_subscription_for(
        &self,
        subscriber: &SubscriberId,
    ) -> Result<Option<Subscription>, SubscriptionError> {
        let mut all = self.subscriptions.find_by_subscriber(subscriber).await?;

        if let Some(pos) = all.iter().position(|s| !s.is_expired()) {
            return Ok(Some(all.swap_remove(pos)));
        }
        Ok(all.pop())
    }

    /// Creates a pending subscription awaiting provider confirmation.
    ///
    /// # Errors
    ///
    /// - `PlanNotFound` if the reference does not resolve
    /// - `AlreadySubscribed` if the subscriber holds a non-expired subscription
    pub async fn create_subscription(
        &self,
        subscriber: SubscriberId,
        plan: impl Into<PlanRef>,
    ) -> Result<Subscription, SubscriptionError> {
        let plan = self.resolve_plan(plan.into()).await?;

        let existing = self.subscriptions.find_by_subscriber(&subscriber).await?;
        if existing.iter().any(|s| !s.is_expired()) {
            return Err(SubscriptionError::already_subscribed(subscriber));
        }

        let mut subscription = Subscription::new_pending(subscriber, plan.id);
        if let Some(interval) = plan.interval {
            subscription = subscription.with_interval(interval);
        }

        self.subscriptions.save(&subscription).await?;

        tracing::info!(
            subscription_id = %subscription.id,
            subscriber = %subscription.subscriber.as_str(),
            plan = %plan.plan_id,
            "Subscription created"
        );
        Ok(subscription)
    }

    async fn resolve_plan(&self, reference: PlanRef) -> Result<Plan, SubscriptionError> {
        let found = match &reference {
            PlanRef::ByEntity(plan) => self.plans.find_by_id(&plan.id).await?,
            PlanRef::ById(id) => self.plans.find_by_id(id).await?,
            PlanRef::ByBusinessKey(key) => self.plans.find_by_business_key(key).await?,
        };

        found.ok_or_else(|| SubscriptionError::plan_not_found(reference.describe()))
    }

    // ════════════════════════════════════════════════════════════════════
    // Provider hand-offs
    // ════════════════════════════════════════════════════════════════════

    pub async fn get_checkout_url(
        &self,
        subscription: &Subscription,
        options: &CheckoutOptions,
    ) -> Result<String, SubscriptionError> {
        let plan = self
            .resolve_plan(PlanRef::ById(subscription.plan_id))
            .await?;

        Ok(self.payment.checkout(subscription, &plan, options).await?)
    }

    pub async fn get_customer_portal_url(
        &self,
        subscription: &Subscription,
    ) -> Result<String, SubscriptionError> {
        Ok(self.payment.customer_portal_url(subscription).await?)
    }

    // ════════════════════════════════════════════════════════════════════
    // Transitions
    // ════════════════════════════════════════════════════════════════════

    /// Saves a provider id set with [`Subscription::set_external_id`] when no
    /// transition stored it already.
    pub async fn store_external_id(&self, subscription: &Subscription) -> Result<(), SubscriptionError> {
        self.subscriptions.save(subscription).await?;
        tracing::info!(
            subscription_id = %subscription.id,
            external_id = subscription.external_subscription_id.as_deref().unwrap_or_default(),
            "Provider subscription id stored"
        );
        Ok(())
    }

    // Each transition returns whether it changed and saved the subscription.

    pub async fn start_trial(
        &self,
        subscription: &mut Subscription,
        trial_ends_at: Timestamp,
    ) -> Result<bool, SubscriptionError> {
        let changed = subscription.start_trial(trial_ends_at)?;
        self.persist(subscription, changed).await
    }

    pub async fn renew_subscription(
        &self,
        subscription: &mut Subscription,
        ends_at: Timestamp,
    ) -> Result<bool, SubscriptionError> {
        let changed = subscription.renew(ends_at)?;
        self.persist(subscription, changed).await
    }

    /// Cancels at period end; access continues until `ends_at`.
    pub async fn cancel_subscription(
        &self,
        subscription: &mut Subscription,
        ends_at: Timestamp,
    ) -> Result<bool, SubscriptionError> {
        let changed = subscription.cancel(ends_at)?;
        self.persist(subscription, changed).await
    }

    pub async fn expire_subscription(&self, subscription: &mut Subscription) -> Result<bool, SubscriptionError> {
        let changed = subscription.expire()?;
        self.persist(subscription, changed).await
    }

    pub async fn pause_subscription(&self, subscription: &mut Subscription) -> Result<bool, SubscriptionError> {
        let changed = subscription.pause()?;
        self.persist(subscription, changed).await
    }

    async fn persist(&self, subscription: &Subscription, changed: bool) -> Result<bool, SubscriptionError> {
        if !changed {
            return Ok(false);
        }

        self.subscriptions.save(subscription).await?;
        tracing::info!(
            subscription_id = %subscription.id,
            status = %subscription.status,
            end_date = %subscription.end_date,
            "Subscription status updated"
        );
        Ok(true)
    }
}

#[async_trait]
impl SubscriptionProvider for SubscriptionManager {
    async fn get_subscription_for(
        &self,
        subscriber: &SubscriberId,
    ) -> Result<Option<Subscription>, DomainError> {
        SubscriptionManager::get_subscription_for(self, subscriber)
            .await
            .map_err(|e| match e {
                SubscriptionError::Infrastructure(inner) => inner,
                other => DomainError::new(other.code(), other.message()),
            })
    }
}
