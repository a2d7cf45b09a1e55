//! Domain events raised by billing webhooks.
//!
//! Each provider event maps to exactly one [`BillingEvent`] variant. The
//! payload shape must fit the event: subscription events carry a
//! subscription resource, payment events carry an invoice.

use super::{InvoiceResource, LemonSqueezyEvent, RemoteEvent, SubscriptionResource, WebhookError};
use crate::domain::foundation::SubscriptionId;

/// Subject of a subscription lifecycle event.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionEvent {
    pub subscription_id: SubscriptionId,
    /// Provider's id for the subscription.
    pub external_id: String,
    pub subscription: Box<SubscriptionResource>,
}

/// Subject of a payment event.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentEvent {
    pub subscription_id: SubscriptionId,
    /// Provider's id for the invoice.
    pub external_id: String,
    pub invoice: Box<InvoiceResource>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BillingEvent {
    SubscriptionCreated(SubscriptionEvent),
    SubscriptionUpdated(SubscriptionEvent),
    SubscriptionCancelled(SubscriptionEvent),
    SubscriptionResumed(SubscriptionEvent),
    SubscriptionExpired(SubscriptionEvent),
    SubscriptionPaused(SubscriptionEvent),
    SubscriptionUnpaused(SubscriptionEvent),
    PaymentSucceeded(PaymentEvent),
    PaymentFailed(PaymentEvent),
    PaymentRecovered(PaymentEvent),
    PaymentRefunded(PaymentEvent),
}

impl BillingEvent {
    /// Translates a remote event. Generic events yield `None`.
    pub fn from_remote(remote: RemoteEvent) -> Result<Option<Self>, WebhookError> {
        match remote {
            RemoteEvent::Subscription {
                event,
                subscription_id,
                subscription,
            } => {
                let subject = SubscriptionEvent {
                    subscription_id,
                    external_id: subscription.id.clone(),
                    subscription,
                };
                let billing = match event {
                    LemonSqueezyEvent::SubscriptionCreated => BillingEvent::SubscriptionCreated(subject),
                    LemonSqueezyEvent::SubscriptionUpdated => BillingEvent::SubscriptionUpdated(subject),
                    LemonSqueezyEvent::SubscriptionCancelled => {
                        BillingEvent::SubscriptionCancelled(subject)
                    }
                    LemonSqueezyEvent::SubscriptionResumed => BillingEvent::SubscriptionResumed(subject),
                    LemonSqueezyEvent::SubscriptionExpired => BillingEvent::SubscriptionExpired(subject),
                    LemonSqueezyEvent::SubscriptionPaused => BillingEvent::SubscriptionPaused(subject),
                    LemonSqueezyEvent::SubscriptionUnpaused => {
                        BillingEvent::SubscriptionUnpaused(subject)
                    }
                    payment => return Err(WebhookError::UnsupportedEvent(payment.to_string())),
                };
                Ok(Some(billing))
            }
            RemoteEvent::SubscriptionPayment {
                event,
                subscription_id,
                invoice,
            } => {
                let subject = PaymentEvent {
                    subscription_id,
                    external_id: invoice.id.clone(),
                    invoice,
                };
                let billing = match event {
                    LemonSqueezyEvent::SubscriptionPaymentSuccess => {
                        BillingEvent::PaymentSucceeded(subject)
                    }
                    LemonSqueezyEvent::SubscriptionPaymentFailed => BillingEvent::PaymentFailed(subject),
                    LemonSqueezyEvent::SubscriptionPaymentRecovered => {
                        BillingEvent::PaymentRecovered(subject)
                    }
                    LemonSqueezyEvent::SubscriptionPaymentRefunded => {
                        BillingEvent::PaymentRefunded(subject)
                    }
                    other => return Err(WebhookError::UnsupportedEvent(other.to_string())),
                };
                Ok(Some(billing))
            }
            RemoteEvent::Generic { .. } => Ok(None),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BillingEvent::SubscriptionCreated(_) => "subscription.created",
            BillingEvent::SubscriptionUpdated(_) => "subscription.updated",
            BillingEvent::SubscriptionCancelled(_) => "subscription.cancelled",
            BillingEvent::SubscriptionResumed(_) => "subscription.resumed",
            BillingEvent::SubscriptionExpired(_) => "subscription.expired",
            BillingEvent::SubscriptionPaused(_) => "subscription.paused",
            BillingEvent::SubscriptionUnpaused(_) => "subscription.unpaused",
            BillingEvent::PaymentSucceeded(_) => "payment.succeeded",
            BillingEvent::PaymentFailed(_) => "payment.failed",
            BillingEvent::PaymentRecovered(_) => "payment.recovered",
            BillingEvent::PaymentRefunded(_) => "payment.refunded",
        }
    }

    pub fn subscription_id(&self) -> SubscriptionId {
        match self {
            BillingEvent::SubscriptionCreated(e)
            | BillingEvent::SubscriptionUpdated(e)
            | BillingEvent::SubscriptionCancelled(e)
            | BillingEvent::SubscriptionResumed(e)
            | BillingEvent::SubscriptionExpired(e)
            | BillingEvent::SubscriptionPaused(e)
            | BillingEvent::SubscriptionUnpaused(e) => e.subscription_id,
            BillingEvent::PaymentSucceeded(e)
            | BillingEvent::PaymentFailed(e)
            | BillingEvent::PaymentRecovered(e)
            | BillingEvent::PaymentRefunded(e) => e.subscription_id,
        }
    }
}
