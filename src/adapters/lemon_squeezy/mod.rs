//! LemonSqueezy payment integration adapters.
//!
//! - `LemonSqueezyClient` - production client over the LemonSqueezy API
//! - `MockPaymentIntegration` - in-process stand-in for tests

mod client;
mod mock_payment_integration;

pub use client::{LemonSqueezyClient, LemonSqueezyConfig, DEFAULT_BASE_URL};
pub use mock_payment_integration::{MethodCall, MockPaymentIntegration};
