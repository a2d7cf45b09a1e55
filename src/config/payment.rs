//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Payment configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Where hosted checkout sends the customer afterwards
    pub return_url: Option<String>,

    #[serde(default)]
    pub lemon_squeezy: LemonSqueezySettings,
}

/// LemonSqueezy API and webhook settings
#[derive(Debug, Clone, Deserialize)]
pub struct LemonSqueezySettings {
    /// Enables the API client and the webhook route
    #[serde(default)]
    pub enabled: bool,

    /// API key (bearer token)
    pub api_key: Option<SecretString>,

    /// Webhook signing secret
    pub webhook_secret: Option<SecretString>,

    pub store_id: Option<String>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Per-request timeout for API calls
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Mirror the provider catalogue into the plan repository at startup
    #[serde(default)]
    pub sync_catalog_on_start: bool,
}

impl LemonSqueezySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate LemonSqueezy settings
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.enabled {
            return Ok(());
        }

        if !is_present(self.api_key.as_ref()) {
            return Err(ValidationError::MissingRequired("LEMON_SQUEEZY__API_KEY"));
        }
        if !is_present(self.webhook_secret.as_ref()) {
            return Err(ValidationError::MissingRequired("LEMON_SQUEEZY__WEBHOOK_SECRET"));
        }
        if self.store_id.as_deref().map_or(true, str::is_empty) {
            return Err(ValidationError::MissingRequired("LEMON_SQUEEZY__STORE_ID"));
        }
        if !is_http_url(&self.api_base_url) {
            return Err(ValidationError::InvalidUrl("LEMON_SQUEEZY__API_BASE_URL"));
        }
        if !(1..=120).contains(&self.timeout_secs) {
            return Err(ValidationError::InvalidProviderTimeout);
        }
        Ok(())
    }
}

impl Default for LemonSqueezySettings {
    fn default() -> Self {
        Self {
            enabled: false,
            api_key: None,
            webhook_secret: None,
            store_id: None,
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout(),
            sync_catalog_on_start: false,
        }
    }
}

impl PaymentConfig {
    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.lemon_squeezy.validate()?;

        match self.return_url.as_deref() {
            Some(url) if !is_http_url(url) => Err(ValidationError::InvalidUrl("PAYMENT__RETURN_URL")),
            None if self.lemon_squeezy.enabled => {
                Err(ValidationError::MissingRequired("PAYMENT__RETURN_URL"))
            }
            _ => Ok(()),
        }
    }
}

fn is_present(secret: Option<&SecretString>) -> bool {
    secret.is_some_and(|s| !s.expose_secret().trim().is_empty())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

fn default_api_base_url() -> String {
    "https://api.lemonsqueezy.com/v1/".to_string()
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(value: &str) -> Option<SecretString> {
        Some(SecretString::new(value.to_string()))
    }

    fn enabled() -> PaymentConfig {
        PaymentConfig {
            return_url: Some("https://app.example.com/billing".to_string()),
            lemon_squeezy: LemonSqueezySettings {
                enabled: true,
                api_key: secret("ls_key"),
                webhook_secret: secret("whsec"),
                store_id: Some("1234".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_disabled_needs_nothing() {
        assert!(PaymentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_enabled_valid_config() {
        let config = enabled();
        assert!(config.validate().is_ok());
        assert_eq!(config.lemon_squeezy.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_enabled_requires_credentials() {
        let mut config = enabled();
        config.lemon_squeezy.api_key = None;
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("LEMON_SQUEEZY__API_KEY"))
        );

        let mut config = enabled();
        config.lemon_squeezy.webhook_secret = secret("   ");
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("LEMON_SQUEEZY__WEBHOOK_SECRET"))
        );

        let mut config = enabled();
        config.lemon_squeezy.store_id = Some(String::new());
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("LEMON_SQUEEZY__STORE_ID"))
        );
    }

    #[test]
    fn test_enabled_requires_return_url() {
        let mut config = enabled();
        config.return_url = None;
        assert!(config.validate().is_err());

        config.return_url = Some("ftp://example.com".to_string());
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidUrl("PAYMENT__RETURN_URL"))
        );
    }

    #[test]
    fn test_timeout_bounds() {
        for (secs, ok) in [(0, false), (1, true), (120, true), (121, false)] {
            let mut config = enabled();
            config.lemon_squeezy.timeout_secs = secs;
            assert_eq!(config.validate().is_ok(), ok, "timeout {}", secs);
        }
    }
}
