//! PlanCatalogSync - Mirrors the payment provider's catalogue into the plan repository.

use std::sync::Arc;

use crate::domain::foundation::ValidationError;
use crate::domain::subscription::{Plan, SubscriptionError};
use crate::ports::{IntegrationProduct, PaymentIntegration, PlanRepository};

/// Counts from one catalogue sync.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    /// Products that could not become a valid plan.
    pub skipped: usize,
}

pub struct PlanCatalogSync {
    payment: Arc<dyn PaymentIntegration>,
    plans: Arc<dyn PlanRepository>,
}

impl PlanCatalogSync {
    pub fn new(payment: Arc<dyn PaymentIntegration>, plans: Arc<dyn PlanRepository>) -> Self {
        Self { payment, plans }
    }

    /// Upserts every provider product by business key (the variant id).
    pub async fn sync(&self) -> Result<SyncReport, SubscriptionError> {
        let products = self.payment.plans().await?;
        let mut report = SyncReport::default();

        for product in &products {
            match self.plans.find_by_business_key(&product.id).await? {
                Some(mut plan) => {
                    let changed = plan.apply_catalog(
                        &product.name,
                        product.description.as_deref(),
                        product.price,
                        product.interval,
                    );
                    if changed {
                        self.plans.save(&plan).await?;
                        report.updated += 1;
                    } else {
                        report.unchanged += 1;
                    }
                }
                None => match new_plan(product) {
                    Ok(plan) => {
                        self.plans.save(&plan).await?;
                        report.created += 1;
                    }
                    Err(e) => {
                        tracing::warn!(product_id = %product.id, error = %e, "Skipping catalogue product");
                        report.skipped += 1;
                    }
                },
            }
        }

        tracing::info!(
            created = report.created,
            updated = report.updated,
            unchanged = report.unchanged,
            skipped = report.skipped,
            "Plan catalogue synced"
        );
        Ok(report)
    }
}

fn new_plan(product: &IntegrationProduct) -> Result<Plan, ValidationError> {
    let mut plan = Plan::new(product.name.clone(), product.id.clone(), product.price)?;
    plan.description = product.description.clone();
    plan.interval = product.interval;
    Ok(plan)
}
