//! Resolved feature values and their entitlement semantics.
//!
//! A [`FeatureValue`] is what every entitlement question is answered from:
//! "is it enabled", "does this usage fit under the quota", "how much is left".
//! The stored payload is a [`FeatureSetting`], a tagged union whose variant
//! *is* the feature type, so a value can never disagree with its type.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::FeatureType;

/// Sentinel integer value meaning "no limit".
pub const UNLIMITED: i64 = -1;

/// Element of an array-typed feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl ScalarValue {
    fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Bool(b) => Some(ScalarValue::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(ScalarValue::Integer)
                .or_else(|| n.as_f64().map(ScalarValue::Float)),
            serde_json::Value::String(s) => Some(ScalarValue::Text(s.clone())),
            _ => None,
        }
    }

    fn to_json(&self) -> serde_json::Value {
        match self {
            ScalarValue::Bool(b) => serde_json::Value::Bool(*b),
            ScalarValue::Integer(i) => serde_json::Value::from(*i),
            ScalarValue::Float(f) => serde_json::Value::from(*f),
            ScalarValue::Text(s) => serde_json::Value::String(s.clone()),
        }
    }
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{}", b),
            ScalarValue::Integer(i) => write!(f, "{}", i),
            ScalarValue::Float(x) => write!(f, "{}", x),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_string())
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Integer(value)
    }
}

/// Typed payload of a feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum FeatureSetting {
    Boolean(bool),
    Integer(i64),
    String(String),
    Array(Vec<ScalarValue>),
}

impl FeatureSetting {
    /// The feature type this payload belongs to.
    pub fn feature_type(&self) -> FeatureType {
        match self {
            FeatureSetting::Boolean(_) => FeatureType::Boolean,
            FeatureSetting::Integer(_) => FeatureType::Integer,
            FeatureSetting::String(_) => FeatureType::String,
            FeatureSetting::Array(_) => FeatureType::Array,
        }
    }

    /// Builds a setting from an untyped JSON value, checking it against `ty`.
    ///
    /// Returns a human-readable reason when the shape does not match.
    pub fn from_json(ty: FeatureType, value: &serde_json::Value) -> Result<Self, String> {
        use serde_json::Value;

        match (ty, value) {
            (FeatureType::Boolean, Value::Bool(b)) => Ok(FeatureSetting::Boolean(*b)),
            (FeatureType::Integer, Value::Number(n)) => n
                .as_i64()
                .map(FeatureSetting::Integer)
                .ok_or_else(|| format!("expected an integer, got {}", n)),
            (FeatureType::String, Value::String(s)) => Ok(FeatureSetting::String(s.clone())),
            (FeatureType::Array, Value::Array(items)) => items
                .iter()
                .map(|item| {
                    ScalarValue::from_json(item)
                        .ok_or_else(|| format!("array items must be scalars, got {}", item))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(FeatureSetting::Array),
            (ty, other) => Err(format!("expected {} value, got {}", ty, json_kind(other))),
        }
    }

    /// Converts back into untyped JSON (for persistence and templates).
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            FeatureSetting::Boolean(b) => serde_json::Value::Bool(*b),
            FeatureSetting::Integer(i) => serde_json::Value::from(*i),
            FeatureSetting::String(s) => serde_json::Value::String(s.clone()),
            FeatureSetting::Array(items) => {
                serde_json::Value::Array(items.iter().map(ScalarValue::to_json).collect())
            }
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

impl From<bool> for FeatureSetting {
    fn from(value: bool) -> Self {
        FeatureSetting::Boolean(value)
    }
}

impl From<i64> for FeatureSetting {
    fn from(value: i64) -> Self {
        FeatureSetting::Integer(value)
    }
}

impl From<&str> for FeatureSetting {
    fn from(value: &str) -> Self {
        FeatureSetting::String(value.to_string())
    }
}

impl From<String> for FeatureSetting {
    fn from(value: String) -> Self {
        FeatureSetting::String(value)
    }
}

impl From<Vec<ScalarValue>> for FeatureSetting {
    fn from(value: Vec<ScalarValue>) -> Self {
        FeatureSetting::Array(value)
    }
}

/// Effective value of a feature for a plan or subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureValue {
    key: String,
    setting: FeatureSetting,
}

impl FeatureValue {
    pub fn new(key: impl Into<String>, setting: FeatureSetting) -> Self {
        Self {
            key: key.into(),
            setting,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn feature_type(&self) -> FeatureType {
        self.setting.feature_type()
    }

    pub fn value(&self) -> &FeatureSetting {
        &self.setting
    }

    /// True only for an integer feature set to [`UNLIMITED`].
    pub fn is_unlimited(&self) -> bool {
        matches!(self.setting, FeatureSetting::Integer(UNLIMITED))
    }

    /// Type-specific truthiness.
    ///
    /// Booleans are their own value, integers are enabled when non-zero
    /// (so unlimited counts as enabled), strings and arrays when non-empty.
    pub fn is_enabled(&self) -> bool {
        match &self.setting {
            FeatureSetting::Boolean(b) => *b,
            FeatureSetting::Integer(i) => *i != 0,
            FeatureSetting::String(s) => !s.is_empty(),
            FeatureSetting::Array(items) => !items.is_empty(),
        }
    }

    /// Whether `current_usage` is still within the entitlement.
    ///
    /// Unlimited always allows. Non-integer features fall back to
    /// [`is_enabled`](Self::is_enabled). Integer quotas allow strictly
    /// below the limit.
    pub fn allows(&self, current_usage: i64) -> bool {
        if self.is_unlimited() {
            return true;
        }

        match &self.setting {
            FeatureSetting::Integer(limit) => current_usage < *limit,
            _ => self.is_enabled(),
        }
    }

    /// Quota left after `current_usage`, floored at zero.
    ///
    /// `None` for unlimited and for non-integer features.
    pub fn remaining_quota(&self, current_usage: i64) -> Option<i64> {
        if self.is_unlimited() {
            return None;
        }

        match &self.setting {
            FeatureSetting::Integer(limit) => Some(limit.saturating_sub(current_usage).max(0)),
            _ => None,
        }
    }

    pub fn as_int(&self) -> i64 {
        match &self.setting {
            FeatureSetting::Integer(i) => *i,
            FeatureSetting::Boolean(b) => i64::from(*b),
            FeatureSetting::String(s) => leading_integer(s),
            FeatureSetting::Array(items) => i64::from(!items.is_empty()),
        }
    }

    pub fn as_bool(&self) -> bool {
        match &self.setting {
            FeatureSetting::Boolean(b) => *b,
            FeatureSetting::Integer(i) => *i != 0,
            FeatureSetting::String(s) => !s.is_empty() && s != "0",
            FeatureSetting::Array(items) => !items.is_empty(),
        }
    }

    /// Arrays are joined with `,`; booleans render as `true`/`false`.
    pub fn as_string(&self) -> String {
        match &self.setting {
            FeatureSetting::Boolean(b) => b.to_string(),
            FeatureSetting::Integer(i) => i.to_string(),
            FeatureSetting::String(s) => s.clone(),
            FeatureSetting::Array(items) => items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Arrays as-is; any scalar is wrapped in a one-element list.
    pub fn as_array(&self) -> Vec<ScalarValue> {
        match &self.setting {
            FeatureSetting::Array(items) => items.clone(),
            FeatureSetting::Boolean(b) => vec![ScalarValue::Bool(*b)],
            FeatureSetting::Integer(i) => vec![ScalarValue::Integer(*i)],
            FeatureSetting::String(s) => vec![ScalarValue::Text(s.clone())],
        }
    }
}

/// Parses the integer prefix of a string ("42 seats" -> 42), 0 if there is none.
fn leading_integer(s: &str) -> i64 {
    let trimmed = s.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return 0;
    }

    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    if negative {
        -magnitude
    } else {
        magnitude
    }
}
