//! Category normalizer tests

use recondash::services::normalize_financial_categories;
use recondash::CategoryAmount;
use serde_json::{json, Value};

fn normalize(input: Value) -> Vec<CategoryAmount> {
    normalize_financial_categories(Some(&input))
}

#[test]
fn test_list_of_records() {
    let out = normalize(json!([
        {"name": "Receitas", "total": 1500},
        {"name": "Despesas", "value": -500},
        {"name": "Investimentos", "amount": 250}
    ]));

    assert_eq!(
        out,
        vec![
            CategoryAmount::new("Receitas", 1500.0),
            CategoryAmount::new("Despesas", 500.0),
            CategoryAmount::new("Investimentos", 250.0),
        ]
    );
}

#[test]
fn test_keyed_map_keeps_key_order() {
    let out = normalize(json!({
        "receitas": {"total_amount": 2000},
        "despesas": {"total": -750},
        "impostos": {"value": 300},
        "investimentos": {"amount": 125},
        "outros": 100
    }));

    assert_eq!(
        out,
        vec![
            CategoryAmount::new("receitas", 2000.0),
            CategoryAmount::new("despesas", 750.0),
            CategoryAmount::new("impostos", 300.0),
            CategoryAmount::new("investimentos", 125.0),
            CategoryAmount::new("outros", 100.0),
        ]
    );
}

#[test]
fn test_uninterpretable_records_are_dropped() {
    let out = normalize(json!([
        null,
        {"name": "Sem Valor"},
        {"total": 200},
        {"name": "Com Texto", "value": "invalid"}
    ]));
    assert!(out.is_empty());
}

#[test]
fn test_absent_and_scalar_inputs() {
    assert!(normalize_financial_categories(None).is_empty());
    assert!(normalize(json!("string")).is_empty());
    assert!(normalize(json!(42)).is_empty());
    assert!(normalize(json!(true)).is_empty());
    assert!(normalize(json!(null)).is_empty());
}

#[test]
fn test_field_priority() {
    let out = normalize(json!([{"name": "A", "value": 2, "total": 1}]));
    assert_eq!(out, vec![CategoryAmount::new("A", 1.0)]);

    let out = normalize(json!({"B": {"total": 1, "total_amount": 3, "amount": 9}}));
    assert_eq!(out, vec![CategoryAmount::new("B", 3.0)]);
}

#[test]
fn test_map_entries_that_cannot_resolve() {
    let out = normalize(json!({
        "texto": "100",
        "lista": [1, 2],
        "nulo": null,
        "vazio": {},
        "ok": {"value": -1.25}
    }));
    assert_eq!(out, vec![CategoryAmount::new("ok", 1.25)]);
}

#[test]
fn test_zero_amounts_survive() {
    let out = normalize(json!([{"name": "Zero", "total": 0}]));
    assert_eq!(out, vec![CategoryAmount::new("Zero", 0.0)]);
}

#[test]
fn test_repeated_names_not_merged() {
    let out = normalize(json!([
        {"name": "Taxas", "value": 1},
        {"name": "Taxas", "value": 2}
    ]));
    assert_eq!(out.len(), 2);
}

#[test]
fn test_array_output_bounded_and_non_negative() {
    let input = json!([
        {"name": "a", "total": -1},
        {"name": "b", "value": 3.5},
        "junk",
        7,
        {"name": "", "amount": 1},
        {"name": "c", "amount": -0.5},
        {"name": false, "value": 1},
        {"name": "d", "total": null, "value": -8}
    ]);
    let len = input.as_array().unwrap().len();
    let out = normalize(input);

    assert!(out.len() <= len);
    assert!(out.iter().all(|c| c.value >= 0.0 && !c.name.is_empty()));
    let names: Vec<&str> = out.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c", "d"]);
}
