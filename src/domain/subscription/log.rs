//! Subscription audit trail.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SubscriptionLogId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionLogType {
    Renewed,
    Cancelled,
    Expired,
    Paused,
    Resumed,
    Activated,
    TrialStarted,
    TrialEnded,
}

/// One status change of a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionLog {
    pub id: SubscriptionLogId,
    pub created_at: Timestamp,
    pub log_type: SubscriptionLogType,
    pub comment: Option<String>,
}

impl SubscriptionLog {
    pub fn new(log_type: SubscriptionLogType) -> Self {
        Self {
            id: SubscriptionLogId::new(),
            created_at: Timestamp::now(),
            log_type,
            comment: None,
        }
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}
