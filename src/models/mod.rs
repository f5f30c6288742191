//! Data models module
//!
//! Defines the response envelope, the normalized category record and the
//! request and response structures of each backend area

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub mod anomaly;
pub mod augmentation;
pub mod validation;

/// Envelope every backend response carries by convention
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the backend considers the call successful
    #[serde(default)]
    pub success: bool,
    /// Payload (optional)
    pub data: Option<T>,
    /// Error description (optional, usually a string)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    /// Informational message (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
}

impl<T> ApiEnvelope<T> {
    /// Best description of why the envelope reports failure
    pub fn failure_message(&self) -> String {
        self.error
            .as_ref()
            .and_then(crate::utils::value::truthy_text)
            .or_else(|| self.message.as_ref().and_then(crate::utils::value::truthy_text))
            .unwrap_or_else(|| "backend reported an unsuccessful response".to_string())
    }
}

/// One named, non-negative amount, as used by category charts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAmount {
    /// Category name (never empty)
    pub name: String,
    /// Absolute amount
    pub value: f64,
}

impl CategoryAmount {
    /// Create a record; the amount is stored as its absolute value
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: value.abs(),
        }
    }
}

/// Accept ids sent either as strings or as numbers
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// Numeric field that may be missing, null or of the wrong type
pub(crate) fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_f64())
}

/// Count field; anything that is not a non-negative number reads as 0
pub(crate) fn lenient_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_count(&Value::deserialize(deserializer)?).unwrap_or(0))
}

/// Optional count; a value that is not a non-negative number reads as absent
pub(crate) fn lenient_opt_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(as_count(&Value::deserialize(deserializer)?))
}

/// Text field that may be missing, null or of the wrong type
pub(crate) fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Flag that may be missing, null or of the wrong type
pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Value::deserialize(deserializer)?.as_bool())
}

fn as_count(value: &Value) -> Option<u64> {
    value.as_f64().filter(|n| *n >= 0.0).map(|n| n as u64)
}

// Secondary wire keys are not separate fields; they land in the flattened
// `extra` map and are read back only when the primary key gave nothing.

pub(crate) fn extra_count(extra: &Map<String, Value>, key: &str) -> Option<u64> {
    extra.get(key).and_then(as_count)
}

pub(crate) fn extra_text<'a>(extra: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    extra.get(key).and_then(Value::as_str)
}

pub(crate) fn extra_bool(extra: &Map<String, Value>, key: &str) -> Option<bool> {
    extra.get(key).and_then(Value::as_bool)
}
