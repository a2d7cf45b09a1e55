//! SubscriptionEventSubscriber - Applies billing events to subscriptions.
//!
//! Subscription events drive the lifecycle from the provider's status:
//!
//! | Provider status | Transition |
//! |---|---|
//! | `active` | renew until `renews_at`, else `ends_at` |
//! | `on_trial` | start trial until `trial_ends_at` |
//! | `cancelled` | cancel, access until `ends_at` |
//! | `expired` | expire |
//! | `paused` | pause |
//! | `past_due`, `unpaid` | none |
//!
//! Payment events are acknowledged without a state change.

use std::sync::Arc;

use crate::domain::foundation::{SubscriptionId, Timestamp};
use crate::domain::subscription::{Subscription, SubscriptionError};
use crate::domain::webhook::{
    BillingEvent, PaymentEvent, ProviderSubscriptionStatus, SubscriptionEvent, WebhookError,
};
use crate::ports::SubscriptionRepository;

use super::SubscriptionManager;

pub struct SubscriptionEventSubscriber {
    subscriptions: Arc<dyn SubscriptionRepository>,
    manager: Arc<SubscriptionManager>,
}

impl SubscriptionEventSubscriber {
    pub fn new(subscriptions: Arc<dyn SubscriptionRepository>, manager: Arc<SubscriptionManager>) -> Self {
        Self {
            subscriptions,
            manager,
        }
    }

    pub async fn handle(&self, event: &BillingEvent) -> Result<(), WebhookError> {
        match event {
            BillingEvent::SubscriptionCreated(subject) => {
                let mut subscription = self.load(subject.subscription_id).await?;
                // Only kept if the transition below succeeds.
                let attached = subscription.set_external_id(subject.external_id.as_str());
                let saved = self.apply_status(&mut subscription, subject).await?;
                if attached && !saved {
                    self.manager.store_external_id(&subscription).await?;
                }
                Ok(())
            }
            BillingEvent::SubscriptionUpdated(subject)
            | BillingEvent::SubscriptionCancelled(subject)
            | BillingEvent::SubscriptionResumed(subject)
            | BillingEvent::SubscriptionExpired(subject)
            | BillingEvent::SubscriptionPaused(subject)
            | BillingEvent::SubscriptionUnpaused(subject) => {
                let mut subscription = self.load(subject.subscription_id).await?;
                self.apply_status(&mut subscription, subject).await?;
                Ok(())
            }
            BillingEvent::PaymentSucceeded(subject)
            | BillingEvent::PaymentFailed(subject)
            | BillingEvent::PaymentRecovered(subject)
            | BillingEvent::PaymentRefunded(subject) => self.acknowledge_payment(event, subject).await,
        }
    }

    async fn load(&self, id: SubscriptionId) -> Result<Subscription, WebhookError> {
        self.subscriptions
            .find_by_id(&id)
            .await?
            .ok_or(WebhookError::SubscriptionNotFound(id))
    }

    /// Returns whether the subscription was saved.
    async fn apply_status(
        &self,
        subscription: &mut Subscription,
        subject: &SubscriptionEvent,
    ) -> Result<bool, WebhookError> {
        let attributes = &subject.subscription.attributes;

        let result: Result<bool, SubscriptionError> = match attributes.status {
            ProviderSubscriptionStatus::Active => {
                let ends_at = attributes
                    .renews_at
                    .or(attributes.ends_at)
                    .ok_or_else(|| missing_date("renews_at or ends_at"))?;
                self.manager.renew_subscription(subscription, ends_at).await
            }
            ProviderSubscriptionStatus::OnTrial => {
                let ends_at = required(attributes.trial_ends_at, "trial_ends_at")?;
                self.manager.start_trial(subscription, ends_at).await
            }
            ProviderSubscriptionStatus::Cancelled => {
                let ends_at = required(attributes.ends_at, "ends_at")?;
                self.manager.cancel_subscription(subscription, ends_at).await
            }
            ProviderSubscriptionStatus::Expired => self.manager.expire_subscription(subscription).await,
            ProviderSubscriptionStatus::Paused => self.manager.pause_subscription(subscription).await,
            ProviderSubscriptionStatus::PastDue | ProviderSubscriptionStatus::Unpaid => {
                tracing::debug!(
                    subscription_id = %subscription.id,
                    status = attributes.status.as_str(),
                    "No transition for provider status"
                );
                Ok(false)
            }
        };

        Ok(result?)
    }

    async fn acknowledge_payment(&self, event: &BillingEvent, subject: &PaymentEvent) -> Result<(), WebhookError> {
        let subscription = self.load(subject.subscription_id).await?;

        tracing::info!(
            subscription_id = %subscription.id,
            invoice_id = %subject.external_id,
            event = event.name(),
            invoice_status = ?subject.invoice.attributes.status,
            "Payment event acknowledged"
        );
        Ok(())
    }
}

fn required(value: Option<Timestamp>, field: &str) -> Result<Timestamp, WebhookError> {
    value.ok_or_else(|| missing_date(field))
}

fn missing_date(field: &str) -> WebhookError {
    WebhookError::ParseError(format!("Subscription status requires {}", field))
}
