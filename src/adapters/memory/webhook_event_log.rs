//! In-memory webhook event log.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::domain::webhook::WebhookEventLogEntry;
use crate::ports::WebhookEventLog;

#[derive(Debug, Default, Clone)]
pub struct InMemoryWebhookEventLog {
    entries: Arc<RwLock<Vec<WebhookEventLogEntry>>>,
}

impl InMemoryWebhookEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    pub async fn entries(&self) -> Vec<WebhookEventLogEntry> {
        self.entries.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl WebhookEventLog for InMemoryWebhookEventLog {
    async fn find_by_digest(
        &self,
        payload_digest: &str,
    ) -> Result<Option<WebhookEventLogEntry>, DomainError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .find(|e| e.payload_digest == payload_digest)
            .cloned())
    }

    async fn save(&self, entry: &WebhookEventLogEntry) -> Result<(), DomainError> {
        self.entries.write().await.push(entry.clone());
        Ok(())
    }
}
