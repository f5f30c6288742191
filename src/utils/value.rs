//! Loose JSON value helpers
//!
//! Backend payloads are not schema-checked; these helpers read them by
//! truthiness the way the dashboard views always have.

use serde_json::Value;

/// Whether a value counts as "set" (`null`, `false`, `0` and `""` do not)
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Text of a truthy value; strings are returned verbatim, anything else as JSON
pub fn truthy_text(value: &Value) -> Option<String> {
    if !is_truthy(value) {
        return None;
    }
    match value {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_truthy_text() {
        assert_eq!(truthy_text(&json!("Receitas")), Some("Receitas".to_string()));
        assert_eq!(truthy_text(&json!(42)), Some("42".to_string()));
        assert_eq!(truthy_text(&json!({"code": 1})), Some("{\"code\":1}".to_string()));
        assert_eq!(truthy_text(&json!("")), None);
    }
}
