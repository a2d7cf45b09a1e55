//! Per-plan feature override.

use serde::{Deserialize, Serialize};

use super::{FeatureSetting, FeatureType, FeatureValue};
use crate::domain::foundation::{PlanFeatureId, PlanId, Timestamp};

/// A plan-specific value that takes precedence over the catalogue default.
///
/// Unique per `(plan_id, feature_key)`. Removed together with its plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanFeature {
    pub id: PlanFeatureId,
    pub plan_id: PlanId,
    pub feature_key: String,
    pub value: FeatureSetting,
    pub description: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PlanFeature {
    pub fn new(
        plan_id: PlanId,
        feature_key: impl Into<String>,
        value: FeatureSetting,
        description: impl Into<String>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id: PlanFeatureId::new(),
            plan_id,
            feature_key: feature_key.into(),
            value,
            description: description.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn feature_type(&self) -> FeatureType {
        self.value.feature_type()
    }

    /// Replaces the stored value, keeping identity.
    pub fn update_value(&mut self, value: FeatureSetting, description: impl Into<String>) {
        self.value = value;
        self.description = description.into();
        self.updated_at = Timestamp::now();
    }

    pub fn to_feature_value(&self) -> FeatureValue {
        FeatureValue::new(self.feature_key.clone(), self.value.clone())
    }

    pub fn is_enabled(&self) -> bool {
        self.to_feature_value().is_enabled()
    }
}
