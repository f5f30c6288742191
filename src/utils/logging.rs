//! Logging utilities
//!
//! Helpers that keep request and response bodies short in debug logs

use serde_json::Value;

/// Set to true to log complete bodies instead of truncated summaries
pub const VERBOSE_BODY_LOGGING: bool = false;

/// Maximum characters of a body kept in a log line
const MAX_BODY_LOG_LEN: usize = 300;

/// Truncate a string with a note about original length
pub fn truncate_content(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len).collect();
        format!("{}... ({} chars truncated)", kept, s.chars().count() - max_len)
    } else {
        s.to_string()
    }
}

/// Create a log-friendly rendering of a JSON body
///
/// Large arrays are summarised by length; everything else is serialized
/// and truncated.
pub fn summarize_body(body: Option<&Value>) -> String {
    match body {
        None => "<empty>".to_string(),
        Some(value) if VERBOSE_BODY_LOGGING => value.to_string(),
        Some(Value::Array(items)) if items.len() > 20 => format!("[...{} items]", items.len()),
        Some(value) => truncate_content(&value.to_string(), MAX_BODY_LOG_LEN),
    }
}
