//! Service layer module
//!
//! Contains the HTTP client, the category normalizer and the wrappers for
//! each backend area

pub mod anomaly;
pub mod augmentation;
pub mod client;
pub mod normalizer;
pub mod validation;

pub use anomaly::AnomalyService;
pub use augmentation::AugmentationService;
pub use client::{encode_path_segment, join_url, ApiClient, JsonApi};
pub use normalizer::normalize_financial_categories;
pub use validation::ValidationService;

use crate::models::ApiEnvelope;
use crate::utils::error::{AppError, AppResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

/// Check the `{success, data, error}` envelope and decode its payload
///
/// A missing `data` field decodes as an empty object so that endpoints
/// answering with only a message still succeed.
pub fn unwrap_envelope<T: DeserializeOwned>(body: Option<Value>, operation: &str) -> AppResult<T> {
    let body = body.ok_or_else(|| {
        AppError::Rejected(format!("{}: backend returned an empty response", operation))
    })?;

    let envelope: ApiEnvelope<Value> = serde_json::from_value(body)?;
    if !envelope.success {
        let message = envelope.failure_message();
        warn!("{} rejected by backend: {}", operation, message);
        return Err(AppError::Rejected(message));
    }

    let data = envelope
        .data
        .filter(|d| !d.is_null())
        .unwrap_or_else(|| Value::Object(serde_json::Map::new()));
    Ok(serde_json::from_value(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unwrap_envelope_success() {
        let data: Vec<i32> = unwrap_envelope(Some(json!({"success": true, "data": [1, 2]})), "list").unwrap();
        assert_eq!(data, vec![1, 2]);
    }

    #[test]
    fn test_unwrap_envelope_missing_data_is_empty_object() {
        let data: Value = unwrap_envelope(Some(json!({"success": true, "message": "ok"})), "review").unwrap();
        assert_eq!(data, json!({}));
    }

    #[test]
    fn test_unwrap_envelope_failure() {
        let err = unwrap_envelope::<Value>(Some(json!({"success": false, "error": "sem permissão"})), "review")
            .unwrap_err();
        assert!(matches!(err, AppError::Rejected(ref m) if m == "sem permissão"));
    }

    #[test]
    fn test_unwrap_envelope_empty_body() {
        let err = unwrap_envelope::<Value>(None, "stats").unwrap_err();
        assert!(matches!(err, AppError::Rejected(_)));
    }

    #[test]
    fn test_unwrap_envelope_bad_data() {
        let err = unwrap_envelope::<Vec<i32>>(Some(json!({"success": true, "data": "x"})), "list").unwrap_err();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
