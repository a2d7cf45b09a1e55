//! Axum router configuration for webhook endpoints.

use axum::{routing::post, Router};

use super::handlers::{handle_lemon_squeezy_webhook, WebhookAppState};

/// Create the webhook router.
///
/// Webhooks carry no user authentication; each delivery is verified by
/// its signature inside the pipeline.
///
/// # Routes
/// - `POST /webhooks/lemon-squeezy` - Handle LemonSqueezy webhooks
pub fn webhook_router() -> Router<WebhookAppState> {
    Router::new().route("/webhooks/lemon-squeezy", post(handle_lemon_squeezy_webhook))
}
