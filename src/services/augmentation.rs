//! Data augmentation service

use super::{unwrap_envelope, JsonApi};
use crate::models::augmentation::{AugmentationMetrics, AugmentationRequest};
use crate::utils::error::AppResult;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

const METRICS_PATH: &str = "api/data-augmentation/metrics";
const AUGMENT_PATH: &str = "api/data-augmentation/augment";

/// Augmentation reporting operations
#[derive(Clone)]
pub struct AugmentationService {
    api: Arc<dyn JsonApi>,
}

impl AugmentationService {
    pub fn new(api: Arc<dyn JsonApi>) -> Self {
        Self { api }
    }

    /// Current augmentation report
    pub async fn metrics(&self) -> AppResult<AugmentationMetrics> {
        let response = self.api.get(METRICS_PATH, &[]).await?;
        unwrap_envelope(response, "augmentation metrics")
    }

    /// Start an augmentation run
    pub async fn augment(&self, request: &AugmentationRequest) -> AppResult<Value> {
        info!("Starting data augmentation run");
        let body = serde_json::to_value(request)?;
        let response = self.api.post(AUGMENT_PATH, Some(body), &[]).await?;
        unwrap_envelope(response, "data augmentation")
    }
}
