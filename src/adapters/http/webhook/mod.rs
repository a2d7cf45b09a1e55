//! HTTP adapter for payment provider webhooks.
//!
//! - `POST /webhooks/lemon-squeezy` - Signed LemonSqueezy deliveries

mod handlers;
mod routes;

pub use handlers::{handle_lemon_squeezy_webhook, WebhookApiError, WebhookAppState, WebhookResponse};
pub use routes::webhook_router;
