//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, errors and the state machine trait
//! shared by the feature, subscription and webhook modules.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{
    PlanFeatureId, PlanId, SubscriberId, SubscriptionId, SubscriptionLogId, WebhookEventLogId,
};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
