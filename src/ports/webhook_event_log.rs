//! WebhookEventLog port - record of handled webhook deliveries.
//!
//! Providers deliver at least once. A delivery whose payload digest is
//! already logged is a byte-identical redelivery and is not re-applied.
//! Failed deliveries are never logged, so provider retries still run.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::webhook::WebhookEventLogEntry;

#[async_trait]
pub trait WebhookEventLog: Send + Sync {
    /// The entry recorded for a payload digest, if any.
    async fn find_by_digest(
        &self,
        payload_digest: &str,
    ) -> Result<Option<WebhookEventLogEntry>, DomainError>;

    async fn save(&self, entry: &WebhookEventLogEntry) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn WebhookEventLog) {}
}
