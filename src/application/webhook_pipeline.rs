//! WebhookPipeline - Command handler for LemonSqueezy webhook deliveries.
//!
//! Steps, in order:
//!
//! 1. Verify the HMAC signature over the raw body
//! 2. Parse into a [`RemoteEvent`] and translate to a [`BillingEvent`]
//! 3. Under the subscription's lock: skip byte-identical redeliveries,
//!    dispatch to the subscriber, record the delivery
//!
//! Nothing is recorded for failed deliveries so provider retries still run.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

use crate::domain::foundation::SubscriptionId;
use crate::domain::webhook::{
    payload_digest, BillingEvent, RemoteEvent, WebhookError, WebhookEventLogEntry, WebhookOutcome,
    WebhookVerifier,
};
use crate::ports::WebhookEventLog;

use super::SubscriptionEventSubscriber;

/// Command to handle one webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleWebhookCommand {
    /// Raw request body, exactly as signed.
    pub payload: Vec<u8>,
    /// `X-Signature` header value.
    pub signature: Option<String>,
}

/// One async mutex per subscription id.
#[derive(Debug, Default)]
pub struct SubscriptionLocks {
    locks: Mutex<HashMap<SubscriptionId, Arc<tokio::sync::Mutex<()>>>>,
}

impl SubscriptionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `id`.
    pub async fn acquire(&self, id: SubscriptionId) -> Result<OwnedMutexGuard<()>, WebhookError> {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .map_err(|_| WebhookError::Infrastructure("Subscription lock registry poisoned".to_string()))?;
            // Unused entries are only referenced by the map.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(id).or_default().clone()
        };
        Ok(lock.lock_owned().await)
    }

    /// Number of ids with a live lock.
    pub fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub struct WebhookPipeline {
    verifier: WebhookVerifier,
    subscriber: SubscriptionEventSubscriber,
    log: Arc<dyn WebhookEventLog>,
    locks: SubscriptionLocks,
}

impl WebhookPipeline {
    pub fn new(
        verifier: WebhookVerifier,
        subscriber: SubscriptionEventSubscriber,
        log: Arc<dyn WebhookEventLog>,
    ) -> Self {
        Self {
            verifier,
            subscriber,
            log,
            locks: SubscriptionLocks::new(),
        }
    }

    pub async fn handle(&self, cmd: HandleWebhookCommand) -> Result<WebhookOutcome, WebhookError> {
        let result = self.process(&cmd).await;

        match &result {
            Ok(outcome) => tracing::debug!(outcome = %outcome, "Webhook delivery handled"),
            Err(e) => tracing::warn!(
                status = e.status_code().as_u16(),
                retryable = e.is_retryable(),
                error = %e,
                "Webhook delivery rejected"
            ),
        }
        result
    }

    async fn process(&self, cmd: &HandleWebhookCommand) -> Result<WebhookOutcome, WebhookError> {
        self.verifier
            .verify(&cmd.payload, cmd.signature.as_deref())?;

        let remote = RemoteEvent::parse(&cmd.payload)?;
        let event_name = remote.name().to_string();
        let digest = payload_digest(&cmd.payload);

        let Some(event) = BillingEvent::from_remote(remote)? else {
            if self.is_duplicate(&digest).await? {
                return Ok(WebhookOutcome::Duplicate);
            }
            tracing::info!(event = %event_name, "Ignoring webhook event");
            self.record(event_name, digest, WebhookOutcome::Ignored).await?;
            return Ok(WebhookOutcome::Ignored);
        };

        let _guard = self.locks.acquire(event.subscription_id()).await?;

        if self.is_duplicate(&digest).await? {
            tracing::info!(
                event = %event_name,
                subscription_id = %event.subscription_id(),
                "Skipping redelivered webhook"
            );
            return Ok(WebhookOutcome::Duplicate);
        }

        self.subscriber.handle(&event).await?;
        self.record(event_name, digest, WebhookOutcome::Processed).await?;

        tracing::info!(
            event = event.name(),
            subscription_id = %event.subscription_id(),
            "Webhook event processed"
        );
        Ok(WebhookOutcome::Processed)
    }

    async fn is_duplicate(&self, digest: &str) -> Result<bool, WebhookError> {
        Ok(self.log.find_by_digest(digest).await?.is_some())
    }

    async fn record(&self, event_name: String, digest: String, outcome: WebhookOutcome) -> Result<(), WebhookError> {
        self.log
            .save(&WebhookEventLogEntry::new(event_name, digest, outcome))
            .await?;
        Ok(())
    }
}
