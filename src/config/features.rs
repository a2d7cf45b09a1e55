//! Feature catalogue configuration
//!
//! Features may be declared inline (`SAAS__FEATURES__MAX_USERS__TYPE=integer`)
//! or in a YAML file referenced by `features_file`:
//!
//! ```yaml
//! max_users:
//!   type: integer
//!   default: 5
//!   description: Seats included in the plan
//! api_access:
//!   type: boolean
//!   default: false
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::feature::FeatureDefinition;

use super::error::ConfigError;

/// Feature key to raw definition, ordered by key
pub type FeatureDefinitions = BTreeMap<String, FeatureDefinition>;

/// Reads a YAML feature catalogue.
pub fn load_features_file(path: &Path) -> Result<FeatureDefinitions, ConfigError> {
    let file_error = |reason: String| ConfigError::FeaturesFile {
        path: path.to_path_buf(),
        reason,
    };

    let raw = std::fs::read_to_string(path).map_err(|e| file_error(e.to_string()))?;
    if raw.trim().is_empty() {
        return Ok(FeatureDefinitions::new());
    }
    serde_yaml::from_str(&raw).map_err(|e| file_error(e.to_string()))
}

/// File entries overlaid with inline entries; inline wins.
pub fn merge_definitions(from_file: FeatureDefinitions, inline: &FeatureDefinitions) -> FeatureDefinitions {
    let mut merged = from_file;
    merged.extend(inline.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feature::FeatureType;
    use serde_json::json;
    use std::io::Write;

    fn definition(feature_type: FeatureType, default: serde_json::Value) -> FeatureDefinition {
        FeatureDefinition {
            feature_type,
            default,
            description: String::new(),
        }
    }

    #[test]
    fn test_load_yaml_catalogue() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "max_users:\n  type: integer\n  default: 5\n  description: Seats\n\
             integrations:\n  type: array\n  default: [slack, github]\n"
        )
        .unwrap();

        let defs = load_features_file(file.path()).unwrap();

        assert_eq!(defs.len(), 2);
        assert_eq!(defs["max_users"].feature_type, FeatureType::Integer);
        assert_eq!(defs["max_users"].default, json!(5));
        assert_eq!(defs["max_users"].description, "Seats");
        assert_eq!(defs["integrations"].default, json!(["slack", "github"]));
    }

    #[test]
    fn test_empty_file_is_empty_catalogue() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(load_features_file(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_features_file(&dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::FeaturesFile { .. }));
    }

    #[test]
    fn test_malformed_yaml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_users:\n  type: colour\n  default: 5").unwrap();

        assert!(matches!(
            load_features_file(file.path()),
            Err(ConfigError::FeaturesFile { .. })
        ));
    }

    #[test]
    fn test_inline_entries_win() {
        let mut file = FeatureDefinitions::new();
        file.insert("seats".into(), definition(FeatureType::Integer, json!(5)));
        file.insert("sso".into(), definition(FeatureType::Boolean, json!(false)));
        let mut inline = FeatureDefinitions::new();
        inline.insert("seats".into(), definition(FeatureType::Integer, json!(10)));

        let merged = merge_definitions(file, &inline);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged["seats"].default, json!(10));
        assert_eq!(merged["sso"].default, json!(false));
    }
}
