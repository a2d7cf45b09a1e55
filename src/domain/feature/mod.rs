//! Feature entitlement domain.
//!
//! # Module Organization
//!
//! - `feature_type` - Declared value type of a feature
//! - `feature_value` - Resolved values with enabled/quota semantics
//! - `feature_config` - Catalogue entries and their raw configuration form
//! - `registry` - Immutable catalogue built at startup
//! - `plan_feature` - Per-plan overrides
//! - `errors` - Feature error types

mod errors;
mod feature_config;
mod feature_type;
mod feature_value;
mod plan_feature;
mod registry;

pub use errors::FeatureError;
pub use feature_config::{FeatureConfig, FeatureDefinition};
pub use feature_type::FeatureType;
pub use feature_value::{FeatureSetting, FeatureValue, ScalarValue, UNLIMITED};
pub use plan_feature::PlanFeature;
pub use registry::FeatureConfigRegistry;
