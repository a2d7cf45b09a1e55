//! Feature cache port.
//!
//! Holds resolved [`FeatureValue`]s keyed `feature:{planId}:{key}`. Only
//! values are cached, never plan or override entities.
//!
//! # Keys and patterns
//!
//! `delete` accepts either an exact key or a pattern ending in `*`, which
//! removes every key sharing the prefix:
//!
//! ```ignore
//! cache.delete(&format!("feature:{}:*", plan_id)).await?;
//! ```

use async_trait::async_trait;

use crate::domain::feature::FeatureValue;
use crate::domain::foundation::{DomainError, PlanId};

/// Read-through cache for resolved feature values.
///
/// Implementations must be safe for concurrent use. Entries carry no
/// freshness guarantee beyond invalidation by the writer.
#[async_trait]
pub trait FeatureCache: Send + Sync {
    /// Returns the cached value, if any.
    async fn get(&self, key: &str) -> Result<Option<FeatureValue>, DomainError>;

    /// Stores a value, replacing any previous entry.
    async fn set(&self, key: &str, value: &FeatureValue) -> Result<(), DomainError>;

    /// Deletes one key, or every key matching a trailing-`*` pattern.
    async fn delete(&self, key_or_pattern: &str) -> Result<(), DomainError>;

    /// Drops every entry.
    async fn clear(&self) -> Result<(), DomainError>;
}

/// Cache key for a plan's feature.
pub fn feature_cache_key(plan_id: &PlanId, feature_key: &str) -> String {
    format!("feature:{}:{}", plan_id, feature_key)
}

/// Pattern matching every cached feature of a plan.
pub fn plan_cache_pattern(plan_id: &PlanId) -> String {
    format!("feature:{}:*", plan_id)
}

/// Whether `key` is selected by `key_or_pattern`.
pub fn key_matches(key_or_pattern: &str, key: &str) -> bool {
    match key_or_pattern.strip_suffix('*') {
        Some(prefix) => key.starts_with(prefix),
        None => key == key_or_pattern,
    }
}
