//! Redis adapters.

mod feature_cache;

pub use feature_cache::RedisFeatureCache;
