//! Financial category normalizer
//!
//! Turns the category payloads the backend sends, either a list of records
//! or a map of category to amount, into one ordered list of
//! [`CategoryAmount`] values.

use crate::models::CategoryAmount;
use crate::utils::value::truthy_text;
use serde_json::{Map, Value};

/// Reads one candidate field from a category object
type FieldAccessor = fn(&Map<String, Value>) -> Option<&Value>;

fn total_amount(o: &Map<String, Value>) -> Option<&Value> {
    o.get("total_amount")
}

fn total(o: &Map<String, Value>) -> Option<&Value> {
    o.get("total")
}

fn value(o: &Map<String, Value>) -> Option<&Value> {
    o.get("value")
}

fn amount(o: &Map<String, Value>) -> Option<&Value> {
    o.get("amount")
}

/// Amount fields of a list record, highest priority first
const RECORD_AMOUNT_FIELDS: [FieldAccessor; 3] = [total, value, amount];

/// Amount fields of a map entry object, highest priority first
const ENTRY_AMOUNT_FIELDS: [FieldAccessor; 4] = [total_amount, total, value, amount];

/// Normalize a category payload
///
/// Entries without a usable name or numeric amount are dropped. Input order
/// is preserved and amounts are reported as absolute values.
pub fn normalize_financial_categories(input: Option<&Value>) -> Vec<CategoryAmount> {
    match input {
        Some(Value::Array(items)) => items.iter().filter_map(normalize_record).collect(),
        Some(Value::Object(entries)) => entries
            .iter()
            .filter_map(|(name, entry)| normalize_entry(name, entry))
            .collect(),
        _ => Vec::new(),
    }
}

fn normalize_record(item: &Value) -> Option<CategoryAmount> {
    let object = item.as_object()?;
    let name = object.get("name").and_then(truthy_text)?;
    let resolved = first_present(object, &RECORD_AMOUNT_FIELDS)?.as_f64()?;

    Some(CategoryAmount::new(name, resolved))
}

fn normalize_entry(name: &str, entry: &Value) -> Option<CategoryAmount> {
    if name.is_empty() {
        return None;
    }

    let resolved = match entry {
        Value::Number(n) => n.as_f64(),
        Value::Object(object) => first_present(object, &ENTRY_AMOUNT_FIELDS).and_then(Value::as_f64),
        _ => None,
    }?;

    Some(CategoryAmount::new(name, resolved))
}

/// First field that is present and not `null`
///
/// The winner is final: a present but non-numeric field does not fall
/// through to lower-priority fields.
fn first_present<'a>(object: &'a Map<String, Value>, accessors: &[FieldAccessor]) -> Option<&'a Value> {
    accessors
        .iter()
        .filter_map(|accessor| accessor(object))
        .find(|value| !value.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_priority_total_over_value() {
        let input = json!([{"name": "Receitas", "total": 10, "value": 99, "amount": 7}]);
        let out = normalize_financial_categories(Some(&input));
        assert_eq!(out, vec![CategoryAmount::new("Receitas", 10.0)]);
    }

    #[test]
    fn test_null_field_falls_through() {
        let input = json!([{"name": "Taxas", "total": null, "amount": -3}]);
        let out = normalize_financial_categories(Some(&input));
        assert_eq!(out, vec![CategoryAmount::new("Taxas", 3.0)]);
    }

    #[test]
    fn test_present_non_number_does_not_fall_through() {
        let input = json!([{"name": "Taxas", "total": "12", "value": 5}]);
        assert!(normalize_financial_categories(Some(&input)).is_empty());
    }

    #[test]
    fn test_entry_priority_total_amount_over_total() {
        let input = json!({"receitas": {"total": 1, "total_amount": 2000}});
        let out = normalize_financial_categories(Some(&input));
        assert_eq!(out, vec![CategoryAmount::new("receitas", 2000.0)]);
    }

    #[test]
    fn test_zero_is_a_valid_amount() {
        let input = json!({"zerado": 0, "vazio": {"total": 0}});
        let out = normalize_financial_categories(Some(&input));
        assert_eq!(
            out,
            vec![CategoryAmount::new("zerado", 0.0), CategoryAmount::new("vazio", 0.0)]
        );
    }

    #[test]
    fn test_empty_key_dropped() {
        let input = json!({"": 10, "ok": 1});
        let out = normalize_financial_categories(Some(&input));
        assert_eq!(out, vec![CategoryAmount::new("ok", 1.0)]);
    }

    #[test]
    fn test_numeric_name_kept_as_text() {
        let input = json!([{"name": 2024, "value": 1}, {"name": 0, "value": 1}]);
        let out = normalize_financial_categories(Some(&input));
        assert_eq!(out, vec![CategoryAmount::new("2024", 1.0)]);
    }
}
