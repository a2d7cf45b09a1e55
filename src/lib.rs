//! SaaS Entitlements - Plan features and subscription lifecycle
//!
//! This crate resolves per-plan feature entitlements (flags, quotas and
//! settings) and keeps subscriptions in step with LemonSqueezy through
//! signed billing webhooks.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
