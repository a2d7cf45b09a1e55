//! Subscription aggregate.
//!
//! A subscription binds one subscriber to one plan. Its status only moves
//! through the transition methods below; each status change appends a
//! [`SubscriptionLog`] entry.
//!
//! # Invariants
//!
//! - Status changes follow [`SubscriptionStatus`]'s state machine
//! - Re-applying the current status with the same end date is a no-op
//! - `start_date` is set by `start_trial` only; other transitions keep it

use serde::{Deserialize, Serialize};

use super::{
    BillingInterval, SubscriptionError, SubscriptionLog, SubscriptionLogType, SubscriptionStatus,
};
use crate::domain::foundation::{PlanId, StateMachine, SubscriberId, SubscriptionId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,

    /// Owner of the subscription.
    pub subscriber: SubscriberId,

    pub plan_id: PlanId,

    pub status: SubscriptionStatus,

    pub start_date: Timestamp,

    /// End of the trial, current period or cancellation grace period.
    pub end_date: Timestamp,

    pub interval: BillingInterval,

    /// Subscription id issued by the payment provider.
    pub external_subscription_id: Option<String>,

    pub logs: Vec<SubscriptionLog>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Subscription {
    /// Creates a subscription waiting for checkout.
    ///
    /// Start and end dates are placeholders until the provider confirms.
    pub fn new_pending(subscriber: SubscriberId, plan_id: PlanId) -> Self {
        let now = Timestamp::now();
        Self {
            id: SubscriptionId::new(),
            subscriber,
            plan_id,
            status: SubscriptionStatus::Pending,
            start_date: now,
            end_date: now,
            interval: BillingInterval::default(),
            external_subscription_id: None,
            logs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_interval(mut self, interval: BillingInterval) -> Self {
        self.interval = interval;
        self
    }

    pub fn is_expired(&self) -> bool {
        self.status == SubscriptionStatus::Expired
    }

    /// Records the provider's id for this subscription. Nothing is saved.
    ///
    /// Returns whether the id changed.
    pub fn set_external_id(&mut self, external_id: impl Into<String>) -> bool {
        let external_id = external_id.into();
        if self.external_subscription_id.as_deref() == Some(external_id.as_str()) {
            return false;
        }
        self.external_subscription_id = Some(external_id);
        self.updated_at = Timestamp::now();
        true
    }

    /// Starts (or extends) the free trial from now until `trial_ends_at`.
    ///
    /// Returns whether anything changed.
    pub fn start_trial(&mut self, trial_ends_at: Timestamp) -> Result<bool, SubscriptionError> {
        let changed = self.apply(
            SubscriptionStatus::Trial,
            Some(trial_ends_at),
            &[SubscriptionLogType::TrialStarted],
        )?;
        if changed {
            self.start_date = self.updated_at;
        }
        Ok(changed)
    }

    /// Activates or renews the subscription until `ends_at`.
    pub fn renew(&mut self, ends_at: Timestamp) -> Result<bool, SubscriptionError> {
        let log_types: &[SubscriptionLogType] = match self.status {
            SubscriptionStatus::Pending => &[SubscriptionLogType::Activated],
            SubscriptionStatus::Trial => {
                &[SubscriptionLogType::TrialEnded, SubscriptionLogType::Activated]
            }
            SubscriptionStatus::Active => &[SubscriptionLogType::Renewed],
            SubscriptionStatus::Paused | SubscriptionStatus::Cancelled => {
                &[SubscriptionLogType::Resumed]
            }
            SubscriptionStatus::Expired => &[],
        };
        self.apply(SubscriptionStatus::Active, Some(ends_at), log_types)
    }

    /// Cancels the subscription; access continues until `ends_at`.
    pub fn cancel(&mut self, ends_at: Timestamp) -> Result<bool, SubscriptionError> {
        self.apply(
            SubscriptionStatus::Cancelled,
            Some(ends_at),
            &[SubscriptionLogType::Cancelled],
        )
    }

    /// Ends the subscription now. Already expired subscriptions are left alone.
    pub fn expire(&mut self) -> Result<bool, SubscriptionError> {
        if self.is_expired() {
            return Ok(false);
        }
        self.apply(
            SubscriptionStatus::Expired,
            Some(Timestamp::now()),
            &[SubscriptionLogType::Expired],
        )
    }

    /// Pauses billing. The end date is kept.
    pub fn pause(&mut self) -> Result<bool, SubscriptionError> {
        self.apply(SubscriptionStatus::Paused, None, &[SubscriptionLogType::Paused])
    }

    fn apply(
        &mut self,
        target: SubscriptionStatus,
        end_date: Option<Timestamp>,
        log_types: &[SubscriptionLogType],
    ) -> Result<bool, SubscriptionError> {
        let status_changes = self.status != target;
        let end_changes = end_date.map_or(false, |end| end != self.end_date);

        if !status_changes && !end_changes {
            return Ok(false);
        }

        self.status
            .transition_to(target)
            .map_err(|_| SubscriptionError::invalid_transition(self.status, target))?;

        if let Some(end) = end_date {
            self.end_date = end;
        }

        // Renewals of an active subscription are logged even though the
        // status stays the same.
        if status_changes || target == SubscriptionStatus::Active {
            for log_type in log_types {
                self.logs.push(SubscriptionLog::new(*log_type));
            }
        }

        self.status = target;
        self.updated_at = Timestamp::now();
        Ok(true)
    }
}
