//! Mock payment integration for testing.
//!
//! Supports:
//! - Pre-configured catalogue and URLs
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::subscription::{Plan, Subscription};
use crate::ports::{CheckoutOptions, IntegrationProduct, PaymentError, PaymentIntegration};

/// In-process [`PaymentIntegration`].
///
/// ```ignore
/// let mock = MockPaymentIntegration::new();
/// mock.set_products(vec![product]);
/// mock.set_method_error("checkout", PaymentError::timeout("slow"));
/// ```
#[derive(Default, Clone)]
pub struct MockPaymentIntegration {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    products: Vec<IntegrationProduct>,

    /// Portal URLs by external subscription id.
    portals: HashMap<String, String>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentIntegration {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════

    pub fn set_products(&self, products: Vec<IntegrationProduct>) {
        self.state().products = products;
    }

    pub fn set_portal_url(&self, external_id: impl Into<String>, url: impl Into<String>) {
        self.state().portals.insert(external_id.into(), url.into());
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Global error is consumed
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

#[async_trait]
impl PaymentIntegration for MockPaymentIntegration {
    async fn checkout(
        &self,
        subscription: &Subscription,
        plan: &Plan,
        options: &CheckoutOptions,
    ) -> Result<String, PaymentError> {
        self.record_call(
            "checkout",
            vec![
                subscription.id.to_string(),
                plan.plan_id.clone(),
                options.email().unwrap_or_default().to_string(),
            ],
        );
        self.check_error("checkout")?;

        Ok(format!(
            "https://checkout.example.test/{}?subscription={}",
            plan.plan_id, subscription.id
        ))
    }

    async fn plans(&self) -> Result<Vec<IntegrationProduct>, PaymentError> {
        self.record_call("plans", vec![]);
        self.check_error("plans")?;

        Ok(self.state().products.clone())
    }

    async fn customer_portal_url(&self, subscription: &Subscription) -> Result<String, PaymentError> {
        self.record_call("customer_portal_url", vec![subscription.id.to_string()]);
        self.check_error("customer_portal_url")?;

        let external_id = subscription
            .external_subscription_id
            .as_deref()
            .ok_or_else(|| PaymentError::not_found("External subscription"))?;

        self.state()
            .portals
            .get(external_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found("Customer portal"))
    }
}
