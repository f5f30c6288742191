//! Data augmentation models

use super::{extra_count, lenient_f64, lenient_opt_count, CategoryAmount};
use crate::services::normalizer::normalize_financial_categories;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Augmentation report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AugmentationMetrics {
    #[serde(deserialize_with = "lenient_opt_count", skip_serializing_if = "Option::is_none")]
    pub original_count: Option<u64>,
    #[serde(deserialize_with = "lenient_opt_count", skip_serializing_if = "Option::is_none")]
    pub augmented_count: Option<u64>,
    #[serde(deserialize_with = "lenient_f64", skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<f64>,
    /// Samples per category, as a map or a list of records
    pub category_distribution: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_run: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AugmentationMetrics {
    /// Chart-ready samples per category
    pub fn category_distribution(&self) -> Vec<CategoryAmount> {
        normalize_financial_categories(Some(&self.category_distribution))
    }

    /// `original_count`, or else `original_samples`
    pub fn original_samples(&self) -> u64 {
        self.original_count
            .or_else(|| extra_count(&self.extra, "original_samples"))
            .unwrap_or(0)
    }

    /// `augmented_count`, or else `augmented_samples`
    pub fn augmented_samples(&self) -> u64 {
        self.augmented_count
            .or_else(|| extra_count(&self.extra, "augmented_samples"))
            .unwrap_or(0)
    }

    /// Augmented samples per original sample, `None` before any data exists
    pub fn augmentation_ratio(&self) -> Option<f64> {
        match self.original_samples() {
            0 => None,
            original => Some(self.augmented_samples() as f64 / original as f64),
        }
    }
}

/// Body of an augmentation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AugmentationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factor: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    /// Method-specific options passed through untouched
    #[serde(flatten)]
    pub options: Map<String, Value>,
}
