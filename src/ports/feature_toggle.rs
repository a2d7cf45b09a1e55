//! Feature toggle port for subscriber-facing entitlement checks.

use async_trait::async_trait;

use crate::domain::feature::{FeatureError, FeatureSetting};
use crate::domain::foundation::SubscriberId;

/// Entitlement checks phrased around a subscriber.
///
/// Undefined feature keys read as "off" rather than failing.
#[async_trait]
pub trait FeatureToggle: Send + Sync {
    /// Whether the feature is enabled for the subscriber.
    async fn is_active(&self, feature_key: &str, subscriber: &SubscriberId)
        -> Result<bool, FeatureError>;

    /// The effective value; `Boolean(false)` for undefined keys.
    async fn value(
        &self,
        feature_key: &str,
        subscriber: &SubscriberId,
    ) -> Result<FeatureSetting, FeatureError>;

    /// Whether the key exists in the feature catalogue.
    fn has_feature(&self, feature_key: &str) -> bool;

    /// Remaining quota; `None` when unlimited or not a quota.
    async fn remaining_quota(
        &self,
        feature_key: &str,
        subscriber: &SubscriberId,
        current_usage: i64,
    ) -> Result<Option<i64>, FeatureError>;

    async fn is_unlimited(
        &self,
        feature_key: &str,
        subscriber: &SubscriberId,
    ) -> Result<bool, FeatureError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn FeatureToggle) {}
}
