//! Anomaly review service
//!
//! Wraps the reconciliation anomaly endpoints of the backend

use super::{encode_path_segment, unwrap_envelope, JsonApi};
use crate::models::anomaly::*;
use crate::utils::error::{helpers::validation_error, AppResult};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

const DETECTION_PATH: &str = "/reconciliation/anomaly-detection";
const LIST_PATH: &str = "/reconciliation/anomalies";
const BATCH_REVIEW_PATH: &str = "/reconciliation/anomaly/batch-review";
const STATISTICS_PATH: &str = "/reconciliation/anomaly/statistics";

/// Anomaly review operations
#[derive(Clone)]
pub struct AnomalyService {
    api: Arc<dyn JsonApi>,
}

impl AnomalyService {
    pub fn new(api: Arc<dyn JsonApi>) -> Self {
        Self { api }
    }

    /// Trigger a detection run
    pub async fn detect(&self, request: &DetectionRequest) -> AppResult<Value> {
        info!("Triggering anomaly detection");
        let body = serde_json::to_value(request)?;
        let response = self.api.post(DETECTION_PATH, Some(body), &[]).await?;
        unwrap_envelope(response, "anomaly detection")
    }

    /// List anomalies matching `query`
    ///
    /// Accepts both `{"anomalies": [...], "total": n}` and a bare list as payload.
    pub async fn list(&self, query: &AnomalyQuery) -> AppResult<AnomalyPage> {
        let params = query.to_params();
        let response = self.api.get(LIST_PATH, &params).await?;
        let data: Value = unwrap_envelope(response, "anomaly list")?;

        let page = match data {
            Value::Array(_) => {
                let anomalies: Vec<Anomaly> = serde_json::from_value(data)?;
                AnomalyPage {
                    total: anomalies.len() as u64,
                    page: query.page.map(u64::from).unwrap_or(1),
                    total_pages: Some(1),
                    anomalies,
                    ..Default::default()
                }
            }
            other => serde_json::from_value(other)?,
        };

        debug!("Fetched {} anomalies (total {})", page.anomalies.len(), page.total);
        Ok(page)
    }

    /// Record a reviewer decision
    pub async fn review(&self, id: &str, request: &ReviewRequest) -> AppResult<Value> {
        let path = anomaly_path(id, "review")?;
        info!("Reviewing anomaly {}: {}", id, request.decision);
        let body = serde_json::to_value(request)?;
        let response = self.api.post(&path, Some(body), &[]).await?;
        unwrap_envelope(response, "anomaly review")
    }

    /// Fetch the suggested resolution
    pub async fn suggestions(&self, id: &str) -> AppResult<ResolutionSuggestion> {
        let path = anomaly_path(id, "suggestions")?;
        let response = self.api.get(&path, &[]).await?;
        unwrap_envelope(response, "resolution suggestions")
    }

    /// Hand an anomaly to another reviewer
    pub async fn escalate(&self, id: &str, request: &EscalationRequest) -> AppResult<Value> {
        let path = anomaly_path(id, "escalate")?;
        if request.escalate_to.trim().is_empty() {
            return Err(validation_error("escalation target cannot be empty"));
        }
        info!("Escalating anomaly {} to {}", id, request.escalate_to);
        let body = serde_json::to_value(request)?;
        let response = self.api.post(&path, Some(body), &[]).await?;
        unwrap_envelope(response, "anomaly escalation")
    }

    /// Apply one decision to several anomalies
    pub async fn batch_review(&self, request: &BatchReviewRequest) -> AppResult<Value> {
        if request.anomaly_ids.is_empty() {
            return Err(validation_error("batch review needs at least one anomaly id"));
        }
        if request.anomaly_ids.iter().any(|id| id.trim().is_empty()) {
            return Err(validation_error("anomaly ids cannot be empty"));
        }
        info!(
            "Batch reviewing {} anomalies: {}",
            request.anomaly_ids.len(),
            request.decision
        );
        let body = serde_json::to_value(request)?;
        let response = self.api.post(BATCH_REVIEW_PATH, Some(body), &[]).await?;
        unwrap_envelope(response, "batch review")
    }

    /// Aggregate counts
    pub async fn statistics(&self) -> AppResult<AnomalyStatistics> {
        let response = self.api.get(STATISTICS_PATH, &[]).await?;
        unwrap_envelope(response, "anomaly statistics")
    }
}

fn anomaly_path(id: &str, action: &str) -> AppResult<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(validation_error("anomaly id cannot be empty"));
    }
    Ok(format!(
        "/reconciliation/anomaly/{}/{}",
        encode_path_segment(id),
        action
    ))
}
