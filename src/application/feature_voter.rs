//! PlanFeatureVoter - Authorization decisions on `FEATURE_*` attributes.
//!
//! ```ignore
//! voter.vote("FEATURE_API_ACCESS", &VoteSubject::Subscriber(acme)).await?;
//! voter.vote("FEATURE_MAX_USERS", &VoteSubject::with_usage(acme, 5)).await?;
//! ```

use std::sync::Arc;

use crate::domain::feature::FeatureError;
use crate::domain::foundation::SubscriberId;

use super::PlanFeatureManager;

pub const ATTRIBUTE_PREFIX: &str = "FEATURE_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    Granted,
    Denied,
    /// Attribute is not a feature attribute.
    Abstain,
}

/// What the vote is about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteSubject {
    /// Is the feature enabled for this subscriber?
    Subscriber(SubscriberId),
    /// Does this usage still fit the subscriber's quota?
    SubscriberWithUsage { subscriber: SubscriberId, usage: i64 },
}

impl VoteSubject {
    pub fn with_usage(subscriber: SubscriberId, usage: i64) -> Self {
        VoteSubject::SubscriberWithUsage { subscriber, usage }
    }
}

pub struct PlanFeatureVoter {
    manager: Arc<PlanFeatureManager>,
}

impl PlanFeatureVoter {
    pub fn new(manager: Arc<PlanFeatureManager>) -> Self {
        Self { manager }
    }

    pub fn supports(attribute: &str) -> bool {
        attribute.starts_with(ATTRIBUTE_PREFIX)
    }

    /// `FEATURE_MAX_USERS` -> `max_users`.
    pub fn feature_key(attribute: &str) -> Option<String> {
        attribute
            .strip_prefix(ATTRIBUTE_PREFIX)
            .map(str::to_lowercase)
    }

    pub async fn vote(&self, attribute: &str, subject: &VoteSubject) -> Result<Vote, FeatureError> {
        let Some(key) = Self::feature_key(attribute) else {
            return Ok(Vote::Abstain);
        };

        let granted = match subject {
            VoteSubject::Subscriber(subscriber) => {
                self.manager.has_feature_for_subscriber(subscriber, &key).await?
            }
            VoteSubject::SubscriberWithUsage { subscriber, usage } => {
                self.manager
                    .can_use_for_subscriber(subscriber, &key, *usage)
                    .await?
            }
        };

        Ok(if granted { Vote::Granted } else { Vote::Denied })
    }
}
