//! Ways a caller can name the plan for a new subscription.

use super::Plan;
use crate::domain::foundation::PlanId;

/// Plan reference, resolved against the plan repository before use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanRef {
    /// A loaded plan; re-read from storage by id.
    ByEntity(Plan),
    /// Internal plan id.
    ById(PlanId),
    /// Business key shared with the payment provider.
    ByBusinessKey(String),
}

impl PlanRef {
    /// Human-readable form used in "plan not found" errors.
    pub fn describe(&self) -> String {
        match self {
            PlanRef::ByEntity(plan) => plan.plan_id.clone(),
            PlanRef::ById(id) => id.to_string(),
            PlanRef::ByBusinessKey(key) => key.clone(),
        }
    }
}

impl From<Plan> for PlanRef {
    fn from(plan: Plan) -> Self {
        PlanRef::ByEntity(plan)
    }
}

impl From<PlanId> for PlanRef {
    fn from(id: PlanId) -> Self {
        PlanRef::ById(id)
    }
}

impl From<&str> for PlanRef {
    fn from(key: &str) -> Self {
        PlanRef::ByBusinessKey(key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_uses_the_business_key_for_entities() {
        let plan = Plan::new("Pro", "variant-9", 900).unwrap();
        assert_eq!(PlanRef::from(plan).describe(), "variant-9");
    }

    #[test]
    fn describe_uses_raw_identifiers_otherwise() {
        let id = PlanId::new();
        assert_eq!(PlanRef::from(id).describe(), id.to_string());
        assert_eq!(PlanRef::from("gold").describe(), "gold");
    }
}
