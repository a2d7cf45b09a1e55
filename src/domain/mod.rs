//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machines)
//! - `feature` - Feature catalogue, typed feature values and plan overrides
//! - `subscription` - Plans and the subscription lifecycle
//! - `webhook` - LemonSqueezy webhook verification, parsing and domain events

pub mod feature;
pub mod foundation;
pub mod subscription;
pub mod webhook;
