//! Startup configuration failures

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::feature::FeatureError;

/// Loading or interpreting the settings tree failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read settings: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid settings: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Cannot read features file {path}: {reason}")]
    FeaturesFile { path: PathBuf, reason: String },

    #[error("Invalid feature catalogue: {0}")]
    InvalidFeature(#[from] FeatureError),
}

/// A loaded value is out of range or missing. Payloads name the env key suffix.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required setting {0}")]
    MissingRequired(&'static str),

    #[error("server.host must be an IP address")]
    InvalidBindAddress,

    #[error("server.port must be non-zero")]
    InvalidPort,

    #[error("server.request_timeout_secs must be between 1 and 300")]
    InvalidTimeout,

    #[error("cache.redis_url must start with redis:// or rediss://")]
    InvalidRedisUrl,

    #[error("{0} must be an http(s) URL")]
    InvalidUrl(&'static str),

    #[error("LemonSqueezy timeout_secs must be between 1 and 120")]
    InvalidProviderTimeout,
}
