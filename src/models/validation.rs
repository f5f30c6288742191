//! Validation report models

use super::{
    extra_bool, extra_count, extra_text, lenient_bool, lenient_count, lenient_opt_count,
    lenient_text,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Outcome of one validation rule
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationResult {
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    #[serde(deserialize_with = "lenient_bool", skip_serializing_if = "Option::is_none")]
    pub passed: Option<bool>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ValidationResult {
    /// `rule`, or else `name`; empty when neither is text
    pub fn rule_name(&self) -> &str {
        self.rule
            .as_deref()
            .or_else(|| extra_text(&self.extra, "name"))
            .unwrap_or("")
    }

    /// `passed`, or else `valid`; a missing or null flag counts as failed
    pub fn is_passed(&self) -> bool {
        self.passed
            .or_else(|| extra_bool(&self.extra, "valid"))
            .unwrap_or(false)
    }
}

/// Aggregated validation results
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationReport {
    #[serde(deserialize_with = "lenient_opt_count", skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(deserialize_with = "lenient_count")]
    pub passed: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub failed: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub warnings: u64,
    pub results: Vec<ValidationResult>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ValidationReport {
    /// `total`, or else `total_validations`
    fn declared_total(&self) -> u64 {
        self.total
            .or_else(|| extra_count(&self.extra, "total_validations"))
            .unwrap_or(0)
    }

    /// Number of validations, derived from the counts when no total was sent
    pub fn effective_total(&self) -> u64 {
        let declared = self.declared_total();
        if declared > 0 {
            declared
        } else if self.passed + self.failed > 0 {
            self.passed + self.failed
        } else {
            self.results.len() as u64
        }
    }

    /// Passed validations, derived from the results when no count was sent
    pub fn effective_passed(&self) -> u64 {
        if self.passed > 0 || self.failed > 0 || self.declared_total() > 0 {
            self.passed
        } else {
            self.results.iter().filter(|r| r.is_passed()).count() as u64
        }
    }

    /// Share of passed validations, `None` when nothing ran
    pub fn pass_rate(&self) -> Option<f64> {
        match self.effective_total() {
            0 => None,
            total => Some(self.effective_passed() as f64 / total as f64),
        }
    }

    /// Results that did not pass
    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| !r.is_passed())
    }
}

/// Body of an ad-hoc validation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationRunRequest {
    /// Records to validate
    pub data: Value,
    /// Rules to apply; empty means every rule the backend knows
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pass_rate_from_counts() {
        let report: ValidationReport =
            serde_json::from_value(json!({"total_validations": 8, "passed": 6, "failed": 2})).unwrap();
        assert_eq!(report.pass_rate(), Some(0.75));
    }

    #[test]
    fn test_pass_rate_from_results() {
        let report: ValidationReport = serde_json::from_value(json!({
            "results": [
                {"name": "balance_matches", "valid": true},
                {"rule": "date_in_period", "passed": false, "message": "fora do período"}
            ]
        }))
        .unwrap();

        assert_eq!(report.pass_rate(), Some(0.5));
        let failures: Vec<_> = report.failures().map(|r| r.rule_name()).collect();
        assert_eq!(failures, vec!["date_in_period"]);
    }

    #[test]
    fn test_pass_rate_empty() {
        assert_eq!(ValidationReport::default().pass_rate(), None);
    }

    #[test]
    fn test_rule_and_name_together() {
        let report: ValidationReport = serde_json::from_value(json!({
            "total": 1,
            "total_validations": 3,
            "results": [{"name": "r1", "rule": "balance", "passed": true, "valid": false}]
        }))
        .unwrap();

        assert_eq!(report.effective_total(), 1);
        assert_eq!(report.results[0].rule_name(), "balance");
        assert!(report.results[0].is_passed());
    }

    #[test]
    fn test_null_passed_counts_as_failed() {
        let report: ValidationReport = serde_json::from_value(json!({
            "results": [
                {"rule": "r1", "passed": null},
                {"rule": null, "name": "r2", "passed": true},
                {"rule": "r3"}
            ]
        }))
        .unwrap();

        let failures: Vec<_> = report.failures().map(|r| r.rule_name()).collect();
        assert_eq!(failures, vec!["r1", "r3"]);
        assert_eq!(report.results[1].rule_name(), "r2");
        assert_eq!(report.pass_rate(), Some(1.0 / 3.0));
    }
}
