//! Plan repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PlanId};
use crate::domain::subscription::Plan;

/// Persistence for plans.
///
/// `plan_id` (the business key) is unique; `save` upserts by `id`.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<Plan>, DomainError>;

    /// Lookup by the business key shared with the payment provider.
    async fn find_by_business_key(&self, plan_id: &str) -> Result<Option<Plan>, DomainError>;

    /// Plans for the given ids; unknown ids are skipped.
    async fn find_by_ids(&self, ids: &[PlanId]) -> Result<Vec<Plan>, DomainError>;

    /// Every plan.
    async fn all(&self) -> Result<Vec<Plan>, DomainError>;

    /// # Errors
    ///
    /// - `AlreadyExists` if another plan holds the same business key
    async fn save(&self, plan: &Plan) -> Result<(), DomainError>;
}
