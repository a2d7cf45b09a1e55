//! Subscription status state machine.
//!
//! ```text
//! Pending ──> Trial ──> Active <──> Paused
//!    │          │         │  ▲        │
//!    │          └──> Cancelled ───────┤
//!    └──────────────────> Expired <───┘
//! ```
//!
//! Re-applying the current status is always accepted so repeated
//! provider notifications (renewals, duplicate updates) stay harmless.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Created locally, waiting for the provider to confirm checkout.
    Pending,

    /// Free trial running until the subscription's end date.
    Trial,

    /// Paid and current.
    Active,

    /// Cancelled by the customer; access continues until the end date.
    Cancelled,

    /// Ended. No further transitions.
    Expired,

    /// Billing paused by the customer or provider.
    Paused,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Pending => "pending",
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Cancelled => "cancelled",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;

        if self == target {
            return true;
        }

        matches!(
            (self, target),
            (Pending, Trial)
                | (Pending, Active)
                | (Pending, Expired)
                | (Trial, Active)
                | (Trial, Cancelled)
                | (Trial, Paused)
                | (Trial, Expired)
                | (Active, Cancelled)
                | (Active, Paused)
                | (Active, Expired)
                | (Cancelled, Active) // resumed within grace period
                | (Cancelled, Expired)
                | (Paused, Active)
                | (Paused, Cancelled)
                | (Paused, Expired)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SubscriptionStatus::*;
        match self {
            Pending => vec![Trial, Active, Expired],
            Trial => vec![Active, Cancelled, Paused, Expired],
            Active => vec![Cancelled, Paused, Expired],
            Cancelled => vec![Active, Expired],
            Paused => vec![Active, Cancelled, Expired],
            Expired => vec![],
        }
    }
}
