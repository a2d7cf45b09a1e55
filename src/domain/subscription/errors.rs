//! Subscription-specific error types.
//!
//! | Error | Retryable |
//! |-------|-----------|
//! | PlanNotFound | no |
//! | NotFound | no |
//! | AlreadySubscribed | no |
//! | InvalidTransition | no |
//! | Payment | provider decides |
//! | Infrastructure | yes |

use super::SubscriptionStatus;
use crate::domain::foundation::{DomainError, ErrorCode, SubscriberId, SubscriptionId};

#[derive(Debug, Clone)]
pub enum SubscriptionError {
    /// No plan matched the given reference.
    PlanNotFound(String),

    /// No subscription with this id.
    NotFound(SubscriptionId),

    /// The subscriber already holds a non-expired subscription.
    AlreadySubscribed(SubscriberId),

    /// The requested status change is not allowed.
    InvalidTransition {
        from: SubscriptionStatus,
        to: SubscriptionStatus,
    },

    /// The payment provider call failed.
    Payment { message: String, retryable: bool },

    /// Repository failure.
    Infrastructure(DomainError),
}

impl SubscriptionError {
    pub fn plan_not_found(reference: impl Into<String>) -> Self {
        SubscriptionError::PlanNotFound(reference.into())
    }

    pub fn not_found(id: SubscriptionId) -> Self {
        SubscriptionError::NotFound(id)
    }

    pub fn already_subscribed(subscriber: SubscriberId) -> Self {
        SubscriptionError::AlreadySubscribed(subscriber)
    }

    pub fn invalid_transition(from: SubscriptionStatus, to: SubscriptionStatus) -> Self {
        SubscriptionError::InvalidTransition { from, to }
    }

    pub fn payment(message: impl Into<String>, retryable: bool) -> Self {
        SubscriptionError::Payment {
            message: message.into(),
            retryable,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            SubscriptionError::PlanNotFound(_) => ErrorCode::PlanNotFound,
            SubscriptionError::NotFound(_) => ErrorCode::SubscriptionNotFound,
            SubscriptionError::AlreadySubscribed(_) => ErrorCode::SubscriptionExists,
            SubscriptionError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            SubscriptionError::Payment { .. } => ErrorCode::PaymentProviderError,
            SubscriptionError::Infrastructure(err) => err.code,
        }
    }

    pub fn message(&self) -> String {
        match self {
            SubscriptionError::PlanNotFound(reference) => {
                format!("Plan \"{}\" not found", reference)
            }
            SubscriptionError::NotFound(id) => format!("Subscription not found: {}", id),
            SubscriptionError::AlreadySubscribed(subscriber) => {
                format!("Subscriber {} already has a subscription", subscriber)
            }
            SubscriptionError::InvalidTransition { from, to } => {
                format!("Cannot move subscription from {} to {}", from, to)
            }
            SubscriptionError::Payment { message, .. } => {
                format!("Payment provider error: {}", message)
            }
            SubscriptionError::Infrastructure(err) => err.message.clone(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            SubscriptionError::Payment { retryable, .. } => *retryable,
            SubscriptionError::Infrastructure(err) => err.code.is_infrastructure(),
            _ => false,
        }
    }
}

impl std::fmt::Display for SubscriptionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SubscriptionError {}

impl From<DomainError> for SubscriptionError {
    fn from(err: DomainError) -> Self {
        SubscriptionError::Infrastructure(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_not_found_names_the_reference() {
        let err = SubscriptionError::plan_not_found("variant-1");
        assert_eq!(err.to_string(), "Plan \"variant-1\" not found");
        assert_eq!(err.code(), ErrorCode::PlanNotFound);
    }

    #[test]
    fn invalid_transition_names_both_states() {
        let err = SubscriptionError::invalid_transition(
            SubscriptionStatus::Expired,
            SubscriptionStatus::Active,
        );
        assert_eq!(err.to_string(), "Cannot move subscription from expired to active");
        assert!(!err.is_retryable());
    }

    #[test]
    fn infrastructure_is_retryable_and_keeps_code() {
        let err: SubscriptionError = DomainError::database("timeout").into();
        assert!(err.is_retryable());
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }

    #[test]
    fn payment_retryability_comes_from_provider() {
        assert!(SubscriptionError::payment("timeout", true).is_retryable());
        assert!(!SubscriptionError::payment("bad request", false).is_retryable());
    }
}
