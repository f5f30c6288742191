//! Anomaly review models
//!
//! Request bodies and lenient response structures for the reconciliation
//! anomaly endpoints, plus the labels and badge colors used to display them

use super::{
    extra_count, extra_text, lenient_count, lenient_f64, lenient_opt_count, lenient_text,
    string_or_number, CategoryAmount,
};
use crate::services::normalizer::normalize_financial_categories;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Backend-assigned priority of an anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
            Severity::Unknown => "unknown",
        }
    }

    /// pt-BR display label
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Baixa",
            Severity::Medium => "Média",
            Severity::High => "Alta",
            Severity::Critical => "Crítica",
            Severity::Unknown => "Desconhecida",
        }
    }

    /// Badge color name
    pub fn badge_color(&self) -> &'static str {
        match self {
            Severity::Low => "green",
            Severity::Medium => "yellow",
            Severity::High => "orange",
            Severity::Critical => "red",
            Severity::Unknown => "gray",
        }
    }
}

/// Review state of an anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyStatus {
    Pending,
    Approved,
    Rejected,
    Escalated,
    Resolved,
    #[default]
    #[serde(other)]
    Unknown,
}

impl AnomalyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyStatus::Pending => "pending",
            AnomalyStatus::Approved => "approved",
            AnomalyStatus::Rejected => "rejected",
            AnomalyStatus::Escalated => "escalated",
            AnomalyStatus::Resolved => "resolved",
            AnomalyStatus::Unknown => "unknown",
        }
    }

    /// pt-BR display label
    pub fn label(&self) -> &'static str {
        match self {
            AnomalyStatus::Pending => "Pendente",
            AnomalyStatus::Approved => "Aprovada",
            AnomalyStatus::Rejected => "Rejeitada",
            AnomalyStatus::Escalated => "Escalada",
            AnomalyStatus::Resolved => "Resolvida",
            AnomalyStatus::Unknown => "Desconhecida",
        }
    }

    /// Badge color name
    pub fn badge_color(&self) -> &'static str {
        match self {
            AnomalyStatus::Pending => "yellow",
            AnomalyStatus::Approved => "green",
            AnomalyStatus::Rejected => "red",
            AnomalyStatus::Escalated => "purple",
            AnomalyStatus::Resolved => "blue",
            AnomalyStatus::Unknown => "gray",
        }
    }

    /// Whether a reviewer still has to act on the anomaly
    pub fn is_open(&self) -> bool {
        matches!(self, AnomalyStatus::Pending | AnomalyStatus::Escalated)
    }
}

/// Decision a reviewer records for an anomaly
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewDecision {
    Approve,
    Reject,
    Escalate,
    Resolve,
}

impl ReviewDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewDecision::Approve => "approve",
            ReviewDecision::Reject => "reject",
            ReviewDecision::Escalate => "escalate",
            ReviewDecision::Resolve => "resolve",
        }
    }

    /// pt-BR display label
    pub fn label(&self) -> &'static str {
        match self {
            ReviewDecision::Approve => "Aprovar",
            ReviewDecision::Reject => "Rejeitar",
            ReviewDecision::Escalate => "Escalar",
            ReviewDecision::Resolve => "Resolver",
        }
    }
}

impl fmt::Display for ReviewDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewDecision {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "approve" => Ok(ReviewDecision::Approve),
            "reject" => Ok(ReviewDecision::Reject),
            "escalate" => Ok(ReviewDecision::Escalate),
            "resolve" => Ok(ReviewDecision::Resolve),
            other => Err(format!(
                "unknown decision '{}', expected one of: approve, reject, escalate, resolve",
                other
            )),
        }
    }
}

/// A flagged mismatch between a bank transaction and a ledger entry
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Anomaly {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Read through [`Anomaly::type_name`], which also accepts `type`
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub anomaly_type: Option<String>,
    pub severity: Severity,
    pub status: AnomalyStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Detector confidence between 0 and 1
    #[serde(deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detected_at: Option<String>,
    /// Fields this client does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Anomaly {
    /// Detector category, from `anomaly_type` or else `type`
    pub fn type_name(&self) -> Option<&str> {
        self.anomaly_type
            .as_deref()
            .or_else(|| extra_text(&self.extra, "type"))
    }
}

/// One page of anomalies
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyPage {
    pub anomalies: Vec<Anomaly>,
    #[serde(deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(deserialize_with = "lenient_count")]
    pub page: u64,
    #[serde(deserialize_with = "lenient_opt_count", skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnomalyPage {
    /// Number of pages, from `total_pages` or else `pages`
    pub fn page_count(&self) -> u64 {
        self.total_pages
            .or_else(|| extra_count(&self.extra, "pages"))
            .unwrap_or(0)
    }
}

/// Filters and pagination for the anomaly list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnomalyQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub severity: Option<String>,
    pub status: Option<String>,
}

impl AnomalyQuery {
    /// Query parameters in a stable order; unset filters are omitted
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(severity) = self.severity.as_deref().filter(|s| !s.is_empty()) {
            params.push(("severity", severity.to_string()));
        }
        if let Some(status) = self.status.as_deref().filter(|s| !s.is_empty()) {
            params.push(("status", status.to_string()));
        }
        params
    }
}

/// Body of a detection run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<f64>,
}

/// Body of a single review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<String>,
}

/// Body of an escalation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EscalationRequest {
    pub escalate_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Body of a bulk review
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReviewRequest {
    pub anomaly_ids: Vec<String>,
    pub decision: ReviewDecision,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Suggested resolution for an anomaly
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionSuggestion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub reasoning: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResolutionSuggestion {
    /// `action`, or else `recommended_action`
    pub fn recommended_action(&self) -> Option<&str> {
        self.action
            .as_deref()
            .or_else(|| extra_text(&self.extra, "recommended_action"))
    }

    /// `reasoning`, or else `explanation`
    pub fn explanation(&self) -> Option<&str> {
        self.reasoning
            .as_deref()
            .or_else(|| extra_text(&self.extra, "explanation"))
    }
}

/// Aggregate anomaly counts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnomalyStatistics {
    #[serde(deserialize_with = "lenient_opt_count", skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Counts per severity, as a map or a list of records
    pub by_severity: Value,
    /// Counts per status, as a map or a list of records
    pub by_status: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AnomalyStatistics {
    /// Number of anomalies, from `total` or else `total_anomalies`
    pub fn total_count(&self) -> u64 {
        self.total
            .or_else(|| extra_count(&self.extra, "total_anomalies"))
            .unwrap_or(0)
    }

    /// Chart-ready counts per severity
    pub fn severity_breakdown(&self) -> Vec<CategoryAmount> {
        normalize_financial_categories(Some(&self.by_severity))
    }

    /// Chart-ready counts per status
    pub fn status_breakdown(&self) -> Vec<CategoryAmount> {
        normalize_financial_categories(Some(&self.by_status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_anomaly_lenient_deserialization() {
        let anomaly: Anomaly = serde_json::from_value(json!({
            "id": 42,
            "type": "amount_mismatch",
            "severity": "critical",
            "status": "under_investigation",
            "amount": "n/a",
            "bank_transaction_id": "tx-9"
        }))
        .unwrap();

        assert_eq!(anomaly.id, "42");
        assert_eq!(anomaly.type_name(), Some("amount_mismatch"));
        assert_eq!(anomaly.severity, Severity::Critical);
        assert_eq!(anomaly.status, AnomalyStatus::Unknown);
        assert_eq!(anomaly.amount, None);
        assert_eq!(anomaly.extra["bank_transaction_id"], "tx-9");
    }

    #[test]
    fn test_query_params() {
        let query = AnomalyQuery {
            page: Some(2),
            limit: Some(20),
            severity: Some("high".to_string()),
            status: None,
        };
        assert_eq!(
            query.to_params(),
            vec![("page", "2".to_string()), ("limit", "20".to_string()), ("severity", "high".to_string())]
        );
        assert!(AnomalyQuery::default().to_params().is_empty());
    }

    #[test]
    fn test_decision_parsing() {
        assert_eq!("Approve".parse::<ReviewDecision>(), Ok(ReviewDecision::Approve));
        assert!("maybe".parse::<ReviewDecision>().is_err());
    }

    #[test]
    fn test_statistics_breakdown() {
        let stats: AnomalyStatistics = serde_json::from_value(json!({
            "total_anomalies": 9,
            "by_severity": {"high": 4, "low": 5},
            "by_status": [{"name": "pending", "value": 9}]
        }))
        .unwrap();

        assert_eq!(stats.total_count(), 9);
        assert_eq!(
            stats.severity_breakdown(),
            vec![CategoryAmount::new("high", 4.0), CategoryAmount::new("low", 5.0)]
        );
        assert_eq!(stats.status_breakdown(), vec![CategoryAmount::new("pending", 9.0)]);
    }

    #[test]
    fn test_primary_and_secondary_keys_together() {
        let stats: AnomalyStatistics =
            serde_json::from_value(json!({"total": 9, "total_anomalies": 7})).unwrap();
        assert_eq!(stats.total_count(), 9);

        let page: AnomalyPage =
            serde_json::from_value(json!({"total_pages": 3, "pages": 5, "anomalies": []})).unwrap();
        assert_eq!(page.page_count(), 3);

        let anomaly: Anomaly =
            serde_json::from_value(json!({"id": 1, "anomaly_type": "duplicate", "type": "other"})).unwrap();
        assert_eq!(anomaly.type_name(), Some("duplicate"));

        let suggestion: ResolutionSuggestion = serde_json::from_value(json!({
            "action": "match",
            "recommended_action": "ignore",
            "explanation": "valor idêntico"
        }))
        .unwrap();
        assert_eq!(suggestion.recommended_action(), Some("match"));
        assert_eq!(suggestion.explanation(), Some("valor idêntico"));
    }

    #[test]
    fn test_null_or_mistyped_fields_degrade() {
        let stats: AnomalyStatistics =
            serde_json::from_value(json!({"total": null, "total_anomalies": 4})).unwrap();
        assert_eq!(stats.total_count(), 4);

        let anomaly: Anomaly = serde_json::from_value(json!({"id": "7", "anomaly_type": 3})).unwrap();
        assert_eq!(anomaly.type_name(), None);
    }
}
