//! Read-only catalogue of the features an installation knows about.

use std::collections::HashMap;

use super::{FeatureConfig, FeatureDefinition, FeatureError};

/// Immutable set of [`FeatureConfig`]s, built once at startup.
///
/// Iteration follows the order entries were supplied in.
#[derive(Debug, Clone, Default)]
pub struct FeatureConfigRegistry {
    configs: Vec<FeatureConfig>,
    index: HashMap<String, usize>,
}

impl FeatureConfigRegistry {
    /// Builds a registry from already validated configs.
    ///
    /// A later entry with a duplicate key replaces the earlier one in place.
    pub fn new(configs: impl IntoIterator<Item = FeatureConfig>) -> Self {
        let mut registry = Self::default();
        for config in configs {
            match registry.index.get(config.key()) {
                Some(&pos) => registry.configs[pos] = config,
                None => {
                    registry
                        .index
                        .insert(config.key().to_string(), registry.configs.len());
                    registry.configs.push(config);
                }
            }
        }
        registry
    }

    /// Builds a registry from raw definitions, validating every default.
    pub fn from_definitions<'a, I>(definitions: I) -> Result<Self, FeatureError>
    where
        I: IntoIterator<Item = (&'a String, &'a FeatureDefinition)>,
    {
        let configs = definitions
            .into_iter()
            .map(|(key, def)| FeatureConfig::from_definition(key.clone(), def))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(configs))
    }

    pub fn has(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Looks up a feature, failing with [`FeatureError::Undefined`].
    pub fn get(&self, key: &str) -> Result<&FeatureConfig, FeatureError> {
        self.index
            .get(key)
            .map(|&pos| &self.configs[pos])
            .ok_or_else(|| FeatureError::undefined(key))
    }

    pub fn all(&self) -> &[FeatureConfig] {
        &self.configs
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.configs.iter().map(FeatureConfig::key)
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }
}
