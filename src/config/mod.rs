//! Runtime settings for the entitlement service.
//!
//! Everything comes from `SAAS__`-prefixed environment variables (a `.env`
//! file is honoured in development). Nesting uses `__`, so
//! `SAAS__CACHE__BACKEND=redis` sets `cache.backend`. The feature catalogue can
//! additionally live in a YAML file named by `SAAS__FEATURES_FILE`.
//!
//! ```no_run
//! use saas_entitlements::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! config.validate()?;
//! let catalogue = config.feature_registry()?;
//! # let _ = catalogue;
//! # Ok(())
//! # }
//! ```

mod cache;
mod error;
mod features;
mod payment;
mod server;

pub use cache::{CacheBackend, CacheConfig};
pub use error::{ConfigError, ValidationError};
pub use features::{load_features_file, merge_definitions, FeatureDefinitions};
pub use payment::{LemonSqueezySettings, PaymentConfig};
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::feature::FeatureConfigRegistry;

/// Top-level settings tree.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// LemonSqueezy credentials and checkout return URL
    #[serde(default)]
    pub payment: PaymentConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    /// Inline feature catalogue; overrides same-named file entries
    #[serde(default)]
    pub features: FeatureDefinitions,

    pub features_file: Option<PathBuf>,
}

impl AppConfig {
    /// Reads `.env` (if any) and the process environment.
    ///
    /// Values are parsed leniently: `SAAS__SERVER__PORT=9000` becomes a
    /// number and `SAAS__FEATURES__SSO__DEFAULT=true` a boolean. Array
    /// defaults are easier to declare in the features file.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("SAAS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    /// Checks every section; the first failure wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        self.cache.validate()?;
        Ok(())
    }

    /// Builds the feature catalogue from the file and inline entries.
    ///
    /// Every default is checked against its declared type.
    pub fn feature_registry(&self) -> Result<FeatureConfigRegistry, ConfigError> {
        let from_file = match &self.features_file {
            Some(path) => load_features_file(path)?,
            None => FeatureDefinitions::new(),
        };
        let definitions = merge_definitions(from_file, &self.features);
        Ok(FeatureConfigRegistry::from_definitions(&definitions)?)
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feature::{FeatureDefinition, FeatureSetting, FeatureType};
    use secrecy::ExposeSecret;
    use serde_json::json;
    use std::env;
    use std::io::Write;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "SAAS__SERVER__PORT",
        "SAAS__SERVER__ENVIRONMENT",
        "SAAS__PAYMENT__RETURN_URL",
        "SAAS__PAYMENT__LEMON_SQUEEZY__ENABLED",
        "SAAS__PAYMENT__LEMON_SQUEEZY__API_KEY",
        "SAAS__PAYMENT__LEMON_SQUEEZY__WEBHOOK_SECRET",
        "SAAS__PAYMENT__LEMON_SQUEEZY__STORE_ID",
        "SAAS__CACHE__BACKEND",
        "SAAS__CACHE__REDIS_URL",
        "SAAS__FEATURES__SEATS__TYPE",
        "SAAS__FEATURES__SEATS__DEFAULT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        clear_env();
        for (key, value) in vars {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    fn definition(feature_type: FeatureType, default: serde_json::Value) -> FeatureDefinition {
        FeatureDefinition {
            feature_type,
            default,
            description: String::new(),
        }
    }

    // ═══════════════════════════════════════════════════════════════
    // Loading
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn test_defaults_without_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[]).unwrap();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert!(!config.payment.lemon_squeezy.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_payment_settings() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("SAAS__PAYMENT__RETURN_URL", "https://app.example.com/billing"),
            ("SAAS__PAYMENT__LEMON_SQUEEZY__ENABLED", "true"),
            ("SAAS__PAYMENT__LEMON_SQUEEZY__API_KEY", "ls_key"),
            ("SAAS__PAYMENT__LEMON_SQUEEZY__WEBHOOK_SECRET", "whsec"),
            ("SAAS__PAYMENT__LEMON_SQUEEZY__STORE_ID", "4321"),
        ])
        .unwrap();

        let ls = &config.payment.lemon_squeezy;
        assert!(ls.enabled);
        assert_eq!(ls.store_id.as_deref(), Some("4321"));
        assert_eq!(
            ls.webhook_secret.as_ref().map(|s| s.expose_secret().as_str()),
            Some("whsec")
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_enabled_without_secrets_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("SAAS__PAYMENT__LEMON_SQUEEZY__ENABLED", "true")]).unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("SAAS__SERVER__ENVIRONMENT", "production")]).unwrap();

        assert!(config.is_production());
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[("SAAS__CACHE__BACKEND", "redis")]).unwrap();

        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("CACHE__REDIS_URL"))
        );
    }

    #[test]
    fn test_inline_feature_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        let config = load_with(&[
            ("SAAS__FEATURES__SEATS__TYPE", "integer"),
            ("SAAS__FEATURES__SEATS__DEFAULT", "10"),
        ])
        .unwrap();

        let registry = config.feature_registry().unwrap();
        let seats = registry.get("seats").unwrap();
        assert_eq!(seats.feature_type(), FeatureType::Integer);
        assert_eq!(seats.default_value(), &FeatureSetting::Integer(10));
    }

    // ═══════════════════════════════════════════════════════════════
    // Feature registry
    // ═══════════════════════════════════════════════════════════════

    #[test]
    fn test_registry_merges_file_under_inline() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "seats:\n  type: integer\n  default: 5\nsso:\n  type: boolean\n  default: true"
        )
        .unwrap();

        let mut config = AppConfig {
            features_file: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        config
            .features
            .insert("seats".into(), definition(FeatureType::Integer, json!(-1)));

        let registry = config.feature_registry().unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("seats").unwrap().default_value(), &FeatureSetting::Integer(-1));
        assert_eq!(registry.get("sso").unwrap().default_value(), &FeatureSetting::Boolean(true));
    }

    #[test]
    fn test_registry_rejects_mistyped_default() {
        let mut config = AppConfig::default();
        config
            .features
            .insert("sso".into(), definition(FeatureType::Boolean, json!("yes")));

        assert!(matches!(
            config.feature_registry(),
            Err(ConfigError::InvalidFeature(_))
        ));
    }
}
