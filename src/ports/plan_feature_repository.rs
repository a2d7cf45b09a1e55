//! Plan feature override repository port.
//!
//! Overrides are unique per `(plan_id, feature_key)`; `save` upserts on
//! that pair.

use async_trait::async_trait;

use crate::domain::feature::PlanFeature;
use crate::domain::foundation::{DomainError, PlanId};

#[async_trait]
pub trait PlanFeatureRepository: Send + Sync {
    /// The override for one plan and key, if stored.
    async fn find_one_by_plan_and_key(
        &self,
        plan_id: &PlanId,
        feature_key: &str,
    ) -> Result<Option<PlanFeature>, DomainError>;

    /// Every override of a plan.
    async fn find_by_plan(&self, plan_id: &PlanId) -> Result<Vec<PlanFeature>, DomainError>;

    /// Every override of any of the given plans.
    async fn find_by_plans(&self, plan_ids: &[PlanId]) -> Result<Vec<PlanFeature>, DomainError>;

    /// Every override of a key, across plans.
    async fn find_by_feature_key(&self, feature_key: &str)
        -> Result<Vec<PlanFeature>, DomainError>;

    /// Inserts or replaces the override for `(plan_id, feature_key)`.
    async fn save(&self, feature: &PlanFeature) -> Result<(), DomainError>;

    /// Deletes the override. Missing rows are not an error.
    async fn remove(&self, feature: &PlanFeature) -> Result<(), DomainError>;
}
