//! In-memory feature cache for tests and single-process deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::feature::FeatureValue;
use crate::domain::foundation::DomainError;
use crate::ports::{key_matches, FeatureCache};

/// `HashMap`-backed [`FeatureCache`]. Entries never expire on their own.
#[derive(Debug, Default, Clone)]
pub struct InMemoryFeatureCache {
    entries: Arc<RwLock<HashMap<String, FeatureValue>>>,
}

impl InMemoryFeatureCache {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[async_trait]
impl FeatureCache for InMemoryFeatureCache {
    async fn get(&self, key: &str) -> Result<Option<FeatureValue>, DomainError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &FeatureValue) -> Result<(), DomainError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.clone());
        Ok(())
    }

    async fn delete(&self, key_or_pattern: &str) -> Result<(), DomainError> {
        self.entries
            .write()
            .await
            .retain(|key, _| !key_matches(key_or_pattern, key));
        Ok(())
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.entries.write().await.clear();
        Ok(())
    }
}
