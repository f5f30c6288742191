//! Validation service

use super::{unwrap_envelope, JsonApi};
use crate::models::validation::{ValidationReport, ValidationRunRequest};
use crate::utils::error::{helpers::validation_error, AppResult};
use std::sync::Arc;
use tracing::info;

const RESULTS_PATH: &str = "api/validation/results";
const VALIDATE_PATH: &str = "api/validation/validate";

/// Validation reporting and ad-hoc validation runs
#[derive(Clone)]
pub struct ValidationService {
    api: Arc<dyn JsonApi>,
}

impl ValidationService {
    pub fn new(api: Arc<dyn JsonApi>) -> Self {
        Self { api }
    }

    /// Latest validation results
    pub async fn results(&self) -> AppResult<ValidationReport> {
        let response = self.api.get(RESULTS_PATH, &[]).await?;
        unwrap_envelope(response, "validation results")
    }

    /// Validate the given records now
    pub async fn validate(&self, request: &ValidationRunRequest) -> AppResult<ValidationReport> {
        if request.data.is_null() {
            return Err(validation_error("validation run needs data"));
        }
        info!("Running ad-hoc validation");
        let body = serde_json::to_value(request)?;
        let response = self.api.post(VALIDATE_PATH, Some(body), &[]).await?;
        unwrap_envelope(response, "validation run")
    }
}
