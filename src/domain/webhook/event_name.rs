//! LemonSqueezy webhook event names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Events we translate into billing events.
///
/// See <https://docs.lemonsqueezy.com/help/webhooks/event-types>.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LemonSqueezyEvent {
    SubscriptionCreated,
    /// Catch-all sent whenever subscription data changes.
    SubscriptionUpdated,
    /// Cancelled by customer or store owner; enters the grace period.
    SubscriptionCancelled,
    /// Resumed during the grace period.
    SubscriptionResumed,
    SubscriptionExpired,
    SubscriptionPaused,
    SubscriptionUnpaused,
    SubscriptionPaymentSuccess,
    SubscriptionPaymentFailed,
    /// Successful payment after a failed one.
    SubscriptionPaymentRecovered,
    SubscriptionPaymentRefunded,
}

impl LemonSqueezyEvent {
    pub const ALL: [LemonSqueezyEvent; 11] = [
        LemonSqueezyEvent::SubscriptionCreated,
        LemonSqueezyEvent::SubscriptionUpdated,
        LemonSqueezyEvent::SubscriptionCancelled,
        LemonSqueezyEvent::SubscriptionResumed,
        LemonSqueezyEvent::SubscriptionExpired,
        LemonSqueezyEvent::SubscriptionPaused,
        LemonSqueezyEvent::SubscriptionUnpaused,
        LemonSqueezyEvent::SubscriptionPaymentSuccess,
        LemonSqueezyEvent::SubscriptionPaymentFailed,
        LemonSqueezyEvent::SubscriptionPaymentRecovered,
        LemonSqueezyEvent::SubscriptionPaymentRefunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LemonSqueezyEvent::SubscriptionCreated => "subscription_created",
            LemonSqueezyEvent::SubscriptionUpdated => "subscription_updated",
            LemonSqueezyEvent::SubscriptionCancelled => "subscription_cancelled",
            LemonSqueezyEvent::SubscriptionResumed => "subscription_resumed",
            LemonSqueezyEvent::SubscriptionExpired => "subscription_expired",
            LemonSqueezyEvent::SubscriptionPaused => "subscription_paused",
            LemonSqueezyEvent::SubscriptionUnpaused => "subscription_unpaused",
            LemonSqueezyEvent::SubscriptionPaymentSuccess => "subscription_payment_success",
            LemonSqueezyEvent::SubscriptionPaymentFailed => "subscription_payment_failed",
            LemonSqueezyEvent::SubscriptionPaymentRecovered => "subscription_payment_recovered",
            LemonSqueezyEvent::SubscriptionPaymentRefunded => "subscription_payment_refunded",
        }
    }

    /// Whether the event reports on a subscription invoice.
    pub fn is_payment(&self) -> bool {
        matches!(
            self,
            LemonSqueezyEvent::SubscriptionPaymentSuccess
                | LemonSqueezyEvent::SubscriptionPaymentFailed
                | LemonSqueezyEvent::SubscriptionPaymentRecovered
                | LemonSqueezyEvent::SubscriptionPaymentRefunded
        )
    }
}

impl fmt::Display for LemonSqueezyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised event name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEvent(pub String);

impl FromStr for LemonSqueezyEvent {
    type Err = UnknownEvent;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LemonSqueezyEvent::ALL
            .into_iter()
            .find(|event| event.as_str() == s)
            .ok_or_else(|| UnknownEvent(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back_to_the_same_event() {
        for event in LemonSqueezyEvent::ALL {
            assert_eq!(event.as_str().parse::<LemonSqueezyEvent>(), Ok(event));
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&LemonSqueezyEvent::SubscriptionPaymentSuccess).unwrap();
        assert_eq!(json, "\"subscription_payment_success\"");
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "order_created".parse::<LemonSqueezyEvent>(),
            Err(UnknownEvent("order_created".to_string()))
        );
    }

    #[test]
    fn payment_events_are_flagged() {
        assert!(LemonSqueezyEvent::SubscriptionPaymentRefunded.is_payment());
        assert!(!LemonSqueezyEvent::SubscriptionUnpaused.is_payment());
    }
}
