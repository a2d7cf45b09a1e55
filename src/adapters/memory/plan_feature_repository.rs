//! In-memory plan feature override repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::feature::PlanFeature;
use crate::domain::foundation::{DomainError, PlanId};
use crate::ports::PlanFeatureRepository;

/// Overrides keyed by `(plan_id, feature_key)`.
#[derive(Debug, Default, Clone)]
pub struct InMemoryPlanFeatureRepository {
    features: Arc<RwLock<HashMap<(PlanId, String), PlanFeature>>>,
}

impl InMemoryPlanFeatureRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.features.read().await.len()
    }
}

#[async_trait]
impl PlanFeatureRepository for InMemoryPlanFeatureRepository {
    async fn find_one_by_plan_and_key(
        &self,
        plan_id: &PlanId,
        feature_key: &str,
    ) -> Result<Option<PlanFeature>, DomainError> {
        Ok(self
            .features
            .read()
            .await
            .get(&(*plan_id, feature_key.to_string()))
            .cloned())
    }

    async fn find_by_plan(&self, plan_id: &PlanId) -> Result<Vec<PlanFeature>, DomainError> {
        let mut found: Vec<PlanFeature> = self
            .features
            .read()
            .await
            .values()
            .filter(|f| f.plan_id == *plan_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.feature_key.cmp(&b.feature_key));
        Ok(found)
    }

    async fn find_by_plans(&self, plan_ids: &[PlanId]) -> Result<Vec<PlanFeature>, DomainError> {
        let mut found: Vec<PlanFeature> = self
            .features
            .read()
            .await
            .values()
            .filter(|f| plan_ids.contains(&f.plan_id))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.feature_key.cmp(&b.feature_key));
        Ok(found)
    }

    async fn find_by_feature_key(
        &self,
        feature_key: &str,
    ) -> Result<Vec<PlanFeature>, DomainError> {
        let mut found: Vec<PlanFeature> = self
            .features
            .read()
            .await
            .values()
            .filter(|f| f.feature_key == feature_key)
            .cloned()
            .collect();
        found.sort_by_key(|f| f.created_at);
        Ok(found)
    }

    async fn save(&self, feature: &PlanFeature) -> Result<(), DomainError> {
        self.features.write().await.insert(
            (feature.plan_id, feature.feature_key.clone()),
            feature.clone(),
        );
        Ok(())
    }

    async fn remove(&self, feature: &PlanFeature) -> Result<(), DomainError> {
        self.features
            .write()
            .await
            .remove(&(feature.plan_id, feature.feature_key.clone()));
        Ok(())
    }
}
