//! Priced product tier.

use serde::{Deserialize, Serialize};

use super::BillingInterval;
use crate::domain::foundation::{PlanId, Timestamp, ValidationError};

/// A plan subscribers can buy.
///
/// `plan_id` is the business key shared with the payment provider
/// (the provider's variant id) and is unique across plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub plan_id: String,
    pub description: Option<String>,
    /// Price in the currency's minor unit.
    pub price: i64,
    pub interval: Option<BillingInterval>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Plan {
    pub fn new(
        name: impl Into<String>,
        plan_id: impl Into<String>,
        price: i64,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        let plan_id = plan_id.into();

        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        if plan_id.trim().is_empty() {
            return Err(ValidationError::empty_field("plan_id"));
        }

        let now = Timestamp::now();
        Ok(Self {
            id: PlanId::new(),
            name,
            plan_id,
            description: None,
            price,
            interval: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_interval(mut self, interval: BillingInterval) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Overwrites catalogue-owned fields with fresh provider data.
    ///
    /// Returns true when anything changed.
    pub fn apply_catalog(
        &mut self,
        name: &str,
        description: Option<&str>,
        price: i64,
        interval: Option<BillingInterval>,
    ) -> bool {
        let changed = self.name != name
            || self.description.as_deref() != description
            || self.price != price
            || self.interval != interval;

        if changed {
            self.name = name.to_string();
            self.description = description.map(str::to_string);
            self.price = price;
            self.interval = interval;
            self.updated_at = Timestamp::now();
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_requires_name_and_business_key() {
        assert!(Plan::new("", "123", 900).is_err());
        assert!(Plan::new("Pro", " ", 900).is_err());
        assert!(Plan::new("Pro", "123", 900).is_ok());
    }

    #[test]
    fn apply_catalog_reports_changes() {
        let mut plan = Plan::new("Pro", "123", 900).unwrap();
        assert!(!plan.apply_catalog("Pro", None, 900, None));
        assert!(plan.apply_catalog("Pro", Some("Best value"), 1200, Some(BillingInterval::yearly())));
        assert_eq!(plan.price, 1200);
        assert_eq!(plan.description.as_deref(), Some("Best value"));
    }
}
