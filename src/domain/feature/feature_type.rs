//! Declared value type of a feature.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// How a feature's value is interpreted and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureType {
    /// On/off switch.
    Boolean,
    /// Quota or numeric limit. `-1` means unlimited.
    Integer,
    /// Free-form setting (theme name, support tier, ...).
    String,
    /// List of scalars (allowed integrations, export formats, ...).
    Array,
}

impl FeatureType {
    /// Returns the configuration spelling of the type.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureType::Boolean => "boolean",
            FeatureType::Integer => "integer",
            FeatureType::String => "string",
            FeatureType::Array => "array",
        }
    }
}

impl fmt::Display for FeatureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(FeatureType::Boolean),
            "integer" => Ok(FeatureType::Integer),
            "string" => Ok(FeatureType::String),
            "array" => Ok(FeatureType::Array),
            other => Err(ValidationError::invalid_format(
                "feature_type",
                format!("unknown feature type '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_configuration_spelling() {
        for ty in [
            FeatureType::Boolean,
            FeatureType::Integer,
            FeatureType::String,
            FeatureType::Array,
        ] {
            assert_eq!(ty.as_str().parse::<FeatureType>().unwrap(), ty);
        }
    }

    #[test]
    fn rejects_unknown_type() {
        assert!("float".parse::<FeatureType>().is_err());
    }

    #[test]
    fn deserializes_lowercase() {
        let ty: FeatureType = serde_json::from_str("\"integer\"").unwrap();
        assert_eq!(ty, FeatureType::Integer);
    }
}
