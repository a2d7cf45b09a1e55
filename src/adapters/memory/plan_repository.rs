//! In-memory plan repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, PlanId};
use crate::domain::subscription::Plan;
use crate::ports::PlanRepository;

#[derive(Debug, Default, Clone)]
pub struct InMemoryPlanRepository {
    plans: Arc<RwLock<HashMap<PlanId, Plan>>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the repository, replacing plans with the same id.
    pub async fn with_plans(self, plans: impl IntoIterator<Item = Plan>) -> Self {
        {
            let mut stored = self.plans.write().await;
            for plan in plans {
                stored.insert(plan.id, plan);
            }
        }
        self
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<Plan>, DomainError> {
        Ok(self.plans.read().await.get(id).cloned())
    }

    async fn find_by_business_key(&self, plan_id: &str) -> Result<Option<Plan>, DomainError> {
        Ok(self
            .plans
            .read()
            .await
            .values()
            .find(|p| p.plan_id == plan_id)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[PlanId]) -> Result<Vec<Plan>, DomainError> {
        let plans = self.plans.read().await;
        Ok(ids.iter().filter_map(|id| plans.get(id).cloned()).collect())
    }

    async fn all(&self) -> Result<Vec<Plan>, DomainError> {
        let mut plans: Vec<Plan> = self.plans.read().await.values().cloned().collect();
        plans.sort_by_key(|p| p.created_at);
        Ok(plans)
    }

    async fn save(&self, plan: &Plan) -> Result<(), DomainError> {
        let mut plans = self.plans.write().await;

        let conflict = plans
            .values()
            .any(|existing| existing.plan_id == plan.plan_id && existing.id != plan.id);
        if conflict {
            return Err(DomainError::new(
                ErrorCode::AlreadyExists,
                format!("Plan with business key {} already exists", plan.plan_id),
            ));
        }

        plans.insert(plan.id, plan.clone());
        Ok(())
    }
}
