//! PlanFeatureManager - Resolves effective feature values for plans and subscribers.
//!
//! Precedence is override > registry default. Resolved values are cached
//! per `(plan, key)`; writes invalidate every cached value of the plan.
//!
//! # Strict vs lenient
//!
//! `get_feature` fails on keys missing from the registry. The predicates
//! (`has_feature`, `can_use` and their subscriber forms) answer `false`
//! instead, since an unknown key simply means "not entitled".

use std::sync::Arc;

use crate::domain::feature::{
    FeatureConfig, FeatureConfigRegistry, FeatureError, FeatureSetting, FeatureValue, PlanFeature,
};
use crate::domain::foundation::{PlanId, SubscriberId};
use crate::domain::subscription::Plan;
use crate::ports::{
    feature_cache_key, plan_cache_pattern, FeatureCache, PlanFeatureRepository, PlanRepository,
    SubscriptionProvider,
};

pub struct PlanFeatureManager {
    registry: Arc<FeatureConfigRegistry>,
    features: Arc<dyn PlanFeatureRepository>,
    plans: Arc<dyn PlanRepository>,
    subscriptions: Arc<dyn SubscriptionProvider>,
    cache: Arc<dyn FeatureCache>,
}

impl PlanFeatureManager {
    pub fn new(
        registry: Arc<FeatureConfigRegistry>,
        features: Arc<dyn PlanFeatureRepository>,
        plans: Arc<dyn PlanRepository>,
        subscriptions: Arc<dyn SubscriptionProvider>,
        cache: Arc<dyn FeatureCache>,
    ) -> Self {
        Self {
            registry,
            features,
            plans,
            subscriptions,
            cache,
        }
    }

    // ════════════════════════════════════════════════════════════════════
    // Plan queries
    // ════════════════════════════════════════════════════════════════════

    /// Effective value of `feature_key` on a plan.
    ///
    /// # Errors
    ///
    /// - `Undefined` if the key is not in the registry
    /// - `Infrastructure` if the override lookup fails
    pub async fn get_feature(
        &self,
        plan_id: &PlanId,
        feature_key: &str,
    ) -> Result<FeatureValue, FeatureError> {
        let config = self.registry.get(feature_key)?;
        let cache_key = feature_cache_key(plan_id, feature_key);

        // Cache failures degrade to a direct lookup.
        match self.cache.get(&cache_key).await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) => tracing::warn!(key = %cache_key, error = %e, "Feature cache read failed"),
        }

        let value = match self
            .features
            .find_one_by_plan_and_key(plan_id, feature_key)
            .await?
        {
            Some(override_row) => override_row.to_feature_value(),
            None => config.to_feature_value(),
        };

        if let Err(e) = self.cache.set(&cache_key, &value).await {
            tracing::warn!(key = %cache_key, error = %e, "Feature cache write failed");
        }

        Ok(value)
    }

    /// Whether the feature is enabled on the plan. Unknown keys are `false`.
    pub async fn has_feature(&self, plan_id: &PlanId, feature_key: &str) -> Result<bool, FeatureError> {
        lenient(self.get_feature(plan_id, feature_key).await, |v| v.is_enabled())
    }

    /// Whether `current_usage` is still within the plan's quota. Unknown keys are `false`.
    pub async fn can_use(
        &self,
        plan_id: &PlanId,
        feature_key: &str,
        current_usage: i64,
    ) -> Result<bool, FeatureError> {
        lenient(self.get_feature(plan_id, feature_key).await, |v| {
            v.allows(current_usage)
        })
    }

    /// Every registry feature resolved for the plan, in registry order.
    pub async fn get_all_features(&self, plan_id: &PlanId) -> Result<Vec<FeatureValue>, FeatureError> {
        let mut resolved = Vec::with_capacity(self.registry.len());
        for key in self.registry.keys() {
            resolved.push(self.get_feature(plan_id, key).await?);
        }
        Ok(resolved)
    }

    // ════════════════════════════════════════════════════════════════════
    // Subscriber queries
    // ════════════════════════════════════════════════════════════════════

    /// Effective value for the plan of the subscriber's current subscription.
    ///
    /// Subscribers without a subscription get the registry default.
    pub async fn get_feature_for_subscriber(
        &self,
        subscriber: &SubscriberId,
        feature_key: &str,
    ) -> Result<FeatureValue, FeatureError> {
        match self.subscriptions.get_subscription_for(subscriber).await? {
            Some(subscription) => self.get_feature(&subscription.plan_id, feature_key).await,
            None => Ok(self.registry.get(feature_key)?.to_feature_value()),
        }
    }

    pub async fn has_feature_for_subscriber(
        &self,
        subscriber: &SubscriberId,
        feature_key: &str,
    ) -> Result<bool, FeatureError> {
        lenient(
            self.get_feature_for_subscriber(subscriber, feature_key).await,
            |v| v.is_enabled(),
        )
    }

    pub async fn can_use_for_subscriber(
        &self,
        subscriber: &SubscriberId,
        feature_key: &str,
        current_usage: i64,
    ) -> Result<bool, FeatureError> {
        lenient(
            self.get_feature_for_subscriber(subscriber, feature_key).await,
            |v| v.allows(current_usage),
        )
    }

    // ════════════════════════════════════════════════════════════════════
    // Overrides
    // ════════════════════════════════════════════════════════════════════

    /// Stores a plan-specific value for `feature_key`.
    ///
    /// # Errors
    ///
    /// - `Undefined` if the key is not in the registry
    /// - `InvalidValue` if `value` does not match the declared type
    pub async fn set_feature(
        &self,
        plan_id: &PlanId,
        feature_key: &str,
        value: FeatureSetting,
    ) -> Result<(), FeatureError> {
        let config = self.registry.get(feature_key)?;

        if value.feature_type() != config.feature_type() {
            return Err(FeatureError::invalid_value(
                feature_key,
                config.feature_type(),
                format!("{} given", value.feature_type()),
            ));
        }

        let row = match self
            .features
            .find_one_by_plan_and_key(plan_id, feature_key)
            .await?
        {
            Some(mut existing) => {
                existing.update_value(value, config.description());
                existing
            }
            None => PlanFeature::new(*plan_id, feature_key, value, config.description()),
        };

        self.features.save(&row).await?;
        self.invalidate(plan_id).await?;

        tracing::debug!(plan_id = %plan_id, feature = feature_key, "Feature override saved");
        Ok(())
    }

    /// Drops the plan's override so the registry default applies again.
    pub async fn remove_feature(&self, plan_id: &PlanId, feature_key: &str) -> Result<(), FeatureError> {
        if let Some(row) = self
            .features
            .find_one_by_plan_and_key(plan_id, feature_key)
            .await?
        {
            self.features.remove(&row).await?;
            self.invalidate(plan_id).await?;
            tracing::debug!(plan_id = %plan_id, feature = feature_key, "Feature override removed");
        }
        Ok(())
    }

    pub async fn get_plan_overrides(&self, plan_id: &PlanId) -> Result<Vec<PlanFeature>, FeatureError> {
        Ok(self.features.find_by_plan(plan_id).await?)
    }

    pub async fn get_overrides_for_plans(
        &self,
        plan_ids: &[PlanId],
    ) -> Result<Vec<PlanFeature>, FeatureError> {
        Ok(self.features.find_by_plans(plan_ids).await?)
    }

    // ════════════════════════════════════════════════════════════════════
    // Catalogue
    // ════════════════════════════════════════════════════════════════════

    /// True if the default is enabled or any plan enables the feature.
    pub async fn is_feature_available_on_any_plan(&self, feature_key: &str) -> Result<bool, FeatureError> {
        let Ok(config) = self.registry.get(feature_key) else {
            return Ok(false);
        };

        if config.to_feature_value().is_enabled() {
            return Ok(true);
        }

        let overrides = self.features.find_by_feature_key(feature_key).await?;
        Ok(overrides.iter().any(PlanFeature::is_enabled))
    }

    /// Plans whose override enables `feature_key`, optionally skipping one plan.
    pub async fn find_plans_with_feature(
        &self,
        feature_key: &str,
        exclude: Option<&PlanId>,
    ) -> Result<Vec<Plan>, FeatureError> {
        let plan_ids: Vec<PlanId> = self
            .features
            .find_by_feature_key(feature_key)
            .await?
            .iter()
            .filter(|row| Some(&row.plan_id) != exclude)
            .filter(|row| row.is_enabled())
            .map(|row| row.plan_id)
            .collect();

        if plan_ids.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self.plans.find_by_ids(&plan_ids).await?)
    }

    pub fn get_available_features(&self) -> &[FeatureConfig] {
        self.registry.all()
    }

    /// Flushes every cached feature value.
    pub async fn reset(&self) -> Result<(), FeatureError> {
        self.cache.clear().await?;
        Ok(())
    }

    async fn invalidate(&self, plan_id: &PlanId) -> Result<(), FeatureError> {
        self.cache.delete(&plan_cache_pattern(plan_id)).await?;
        Ok(())
    }
}

/// Maps `Undefined` to `false`, keeping every other error.
fn lenient(
    resolved: Result<FeatureValue, FeatureError>,
    predicate: impl FnOnce(&FeatureValue) -> bool,
) -> Result<bool, FeatureError> {
    match resolved {
        Ok(value) => Ok(predicate(&value)),
        Err(e) if e.is_undefined() => Ok(false),
        Err(e) => Err(e),
    }
}
