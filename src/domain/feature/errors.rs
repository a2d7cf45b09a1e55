//! Feature resolution errors.

use thiserror::Error;

use super::FeatureType;
use crate::domain::foundation::DomainError;

/// Errors raised while resolving or changing feature values.
#[derive(Debug, Clone, Error)]
pub enum FeatureError {
    /// The key is not part of the configured catalogue.
    #[error("Feature \"{0}\" is not defined")]
    Undefined(String),

    /// A value does not match the declared type of its feature.
    #[error("Invalid value for feature \"{key}\" (expected {expected}): {reason}")]
    InvalidValue {
        key: String,
        expected: FeatureType,
        reason: String,
    },

    /// Repository or cache failure.
    #[error(transparent)]
    Infrastructure(#[from] DomainError),
}

impl FeatureError {
    pub fn undefined(key: impl Into<String>) -> Self {
        FeatureError::Undefined(key.into())
    }

    pub fn invalid_value(
        key: impl Into<String>,
        expected: FeatureType,
        reason: impl Into<String>,
    ) -> Self {
        FeatureError::InvalidValue {
            key: key.into(),
            expected,
            reason: reason.into(),
        }
    }

    /// True when the error only means "this key is unknown".
    ///
    /// Lenient predicates turn these into `false`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, FeatureError::Undefined(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn undefined_displays_key() {
        let err = FeatureError::undefined("sso");
        assert_eq!(err.to_string(), "Feature \"sso\" is not defined");
        assert!(err.is_undefined());
    }

    #[test]
    fn invalid_value_displays_expected_type() {
        let err = FeatureError::invalid_value("max_users", FeatureType::Integer, "got string");
        assert_eq!(
            err.to_string(),
            "Invalid value for feature \"max_users\" (expected integer): got string"
        );
        assert!(!err.is_undefined());
    }

    #[test]
    fn infrastructure_is_transparent() {
        let err: FeatureError = DomainError::new(ErrorCode::CacheError, "down").into();
        assert_eq!(err.to_string(), "[CACHE_ERROR] down");
    }
}
