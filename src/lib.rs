//! Financial reconciliation dashboard client
//!
//! Provides the backend HTTP client, the category normalizer and the service
//! wrappers the dashboard views are built on

pub mod config;
pub mod models;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use models::{ApiEnvelope, CategoryAmount};
pub use services::{
    normalize_financial_categories, AnomalyService, ApiClient, AugmentationService, JsonApi,
    ValidationService,
};
pub use utils::error::{ApiError, ApiResult, AppError, AppResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
