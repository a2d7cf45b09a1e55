//! Catalogue entries for known features.

use serde::{Deserialize, Serialize};

use super::{FeatureError, FeatureSetting, FeatureType, FeatureValue};

/// Raw feature declaration as written in configuration.
///
/// ```yaml
/// max_users:
///   type: integer
///   default: 10
///   description: Seats included in the plan
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDefinition {
    #[serde(rename = "type")]
    pub feature_type: FeatureType,

    pub default: serde_json::Value,

    #[serde(default)]
    pub description: String,
}

/// Validated catalogue entry: key, type, default and description.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureConfig {
    key: String,
    default_value: FeatureSetting,
    description: String,
}

impl FeatureConfig {
    pub fn new(
        key: impl Into<String>,
        default_value: FeatureSetting,
        description: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            default_value,
            description: description.into(),
        }
    }

    /// Validates a raw definition's default against its declared type.
    pub fn from_definition(
        key: impl Into<String>,
        definition: &FeatureDefinition,
    ) -> Result<Self, FeatureError> {
        let key = key.into();
        let default_value = FeatureSetting::from_json(definition.feature_type, &definition.default)
            .map_err(|reason| FeatureError::invalid_value(&key, definition.feature_type, reason))?;

        Ok(Self::new(key, default_value, definition.description.clone()))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn feature_type(&self) -> FeatureType {
        self.default_value.feature_type()
    }

    pub fn default_value(&self) -> &FeatureSetting {
        &self.default_value
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The default as a resolved value.
    pub fn to_feature_value(&self) -> FeatureValue {
        FeatureValue::new(self.key.clone(), self.default_value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_definition_validates_default() {
        let def = FeatureDefinition {
            feature_type: FeatureType::Integer,
            default: json!(10),
            description: "Seats".into(),
        };
        let config = FeatureConfig::from_definition("max_users", &def).unwrap();
        assert_eq!(config.feature_type(), FeatureType::Integer);
        assert_eq!(config.description(), "Seats");
        assert_eq!(config.to_feature_value().as_int(), 10);
    }

    #[test]
    fn from_definition_rejects_mismatched_default() {
        let def = FeatureDefinition {
            feature_type: FeatureType::Boolean,
            default: json!("yes"),
            description: String::new(),
        };
        let err = FeatureConfig::from_definition("api_access", &def).unwrap_err();
        assert!(matches!(err, FeatureError::InvalidValue { .. }));
    }

    #[test]
    fn definition_description_defaults_to_empty() {
        let def: FeatureDefinition =
            serde_json::from_value(json!({"type": "boolean", "default": true})).unwrap();
        assert_eq!(def.description, "");
    }
}
