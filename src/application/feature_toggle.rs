//! PlanFeatureToggle - Subscriber-facing entitlement checks backed by plan features.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::feature::{FeatureError, FeatureSetting, FeatureValue};
use crate::domain::foundation::SubscriberId;
use crate::ports::FeatureToggle;

use super::PlanFeatureManager;

pub struct PlanFeatureToggle {
    manager: Arc<PlanFeatureManager>,
}

impl PlanFeatureToggle {
    pub fn new(manager: Arc<PlanFeatureManager>) -> Self {
        Self { manager }
    }

    /// Resolved value, or `None` for keys outside the registry.
    async fn resolve(
        &self,
        feature_key: &str,
        subscriber: &SubscriberId,
    ) -> Result<Option<FeatureValue>, FeatureError> {
        match self
            .manager
            .get_feature_for_subscriber(subscriber, feature_key)
            .await
        {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.is_undefined() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl FeatureToggle for PlanFeatureToggle {
    async fn is_active(&self, feature_key: &str, subscriber: &SubscriberId) -> Result<bool, FeatureError> {
        self.manager
            .has_feature_for_subscriber(subscriber, feature_key)
            .await
    }

    async fn value(
        &self,
        feature_key: &str,
        subscriber: &SubscriberId,
    ) -> Result<FeatureSetting, FeatureError> {
        Ok(self
            .resolve(feature_key, subscriber)
            .await?
            .map(|v| v.value().clone())
            .unwrap_or(FeatureSetting::Boolean(false)))
    }

    fn has_feature(&self, feature_key: &str) -> bool {
        self.manager
            .get_available_features()
            .iter()
            .any(|config| config.key() == feature_key)
    }

    /// Unknown keys have nothing left; unlimited and non-integer features have no quota.
    async fn remaining_quota(
        &self,
        feature_key: &str,
        subscriber: &SubscriberId,
        current_usage: i64,
    ) -> Result<Option<i64>, FeatureError> {
        Ok(match self.resolve(feature_key, subscriber).await? {
            Some(value) => value.remaining_quota(current_usage),
            None => Some(0),
        })
    }

    async fn is_unlimited(&self, feature_key: &str, subscriber: &SubscriberId) -> Result<bool, FeatureError> {
        Ok(self
            .resolve(feature_key, subscriber)
            .await?
            .is_some_and(|v| v.is_unlimited()))
    }
}
