//! LemonSqueezy webhook domain module.
//!
//! # Module Structure
//!
//! - `verifier` - HMAC-SHA256 signature check on the raw body
//! - `remote_event` - Structural validation and payload conversion
//! - `dto` - Provider resource shapes
//! - `event_name` - Provider event names
//! - `billing_event` - Closed set of domain events
//! - `event_log` - Handled-delivery records and payload digests
//! - `errors` - Webhook errors with HTTP status mapping

mod billing_event;
mod dto;
mod errors;
mod event_log;
mod event_name;
mod remote_event;
mod verifier;

pub use billing_event::{BillingEvent, PaymentEvent, SubscriptionEvent};
pub use dto::{
    BillingReason, FirstSubscriptionItem, InvoiceAttributes, InvoiceResource, InvoiceStatus,
    ProviderSubscriptionStatus, SubscriptionAttributes, SubscriptionPause, SubscriptionResource,
    SubscriptionUrls,
};
pub use errors::WebhookError;
pub use event_log::{payload_digest, WebhookEventLogEntry, WebhookOutcome};
pub use event_name::{LemonSqueezyEvent, UnknownEvent};
pub use remote_event::RemoteEvent;
pub use verifier::{WebhookVerifier, SIGNATURE_HEADER};
