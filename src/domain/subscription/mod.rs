//! Subscription domain module.
//!
//! Plans, subscriptions and the subscription lifecycle.
//!
//! # Module Structure
//!
//! - `aggregate` - Subscription aggregate entity
//! - `status` - SubscriptionStatus state machine
//! - `log` - Audit entries appended on status changes
//! - `plan` - Priced product tier
//! - `plan_ref` - Ways to name a plan when subscribing
//! - `billing_interval` - Billing period length

mod aggregate;
mod billing_interval;
mod errors;
mod log;
mod plan;
mod plan_ref;
mod status;

pub use aggregate::Subscription;
pub use billing_interval::{BillingInterval, IntervalUnit};
pub use errors::SubscriptionError;
pub use log::{SubscriptionLog, SubscriptionLogType};
pub use plan::Plan;
pub use plan_ref::PlanRef;
pub use status::SubscriptionStatus;
