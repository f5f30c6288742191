//! File-based configuration loading
//!
//! Loads optional API configuration from a JSON file

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = "recondash.json";

/// Configuration loaded from a JSON file
///
/// Every field is optional; environment variables override whatever is set here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// Runtime mode ("development", "production", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Development base URL
    #[serde(rename = "developmentUrl", default, skip_serializing_if = "Option::is_none")]
    pub development_url: Option<String>,

    /// Production base URL
    #[serde(rename = "productionUrl", default, skip_serializing_if = "Option::is_none")]
    pub production_url: Option<String>,

    /// Origin the dashboard is served from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Headers added to every request
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,
}

impl FileConfig {
    /// Load configuration from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading configuration from: {:?}", path);

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        let config: FileConfig = serde_json::from_str(&content)
            .with_context(|| "Failed to parse config JSON")?;

        config.validate()?;

        debug!("Loaded {} default headers", config.headers.len());
        Ok(config)
    }

    /// Load configuration from default locations
    /// Searches in order:
    /// 1. ~/.config/recondash/recondash.json
    /// 2. ./recondash.json
    ///
    /// Returns `None` when no file exists; a file that exists but cannot be
    /// read or parsed is an error.
    pub fn load_default() -> Result<Option<Self>> {
        for path in Self::default_paths() {
            if path.exists() {
                return Self::load(&path).map(Some);
            }
        }

        debug!("No configuration file found, using environment only");
        Ok(None)
    }

    /// Candidate locations, highest priority first
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".config").join("recondash").join(CONFIG_FILE_NAME));
        }
        paths.push(PathBuf::from(CONFIG_FILE_NAME));
        paths
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        for (label, url) in [
            ("developmentUrl", &self.development_url),
            ("productionUrl", &self.production_url),
        ] {
            if let Some(url) = url {
                if !url.starts_with("http") {
                    anyhow::bail!("Invalid {} in config file: {}", label, url);
                }
            }
        }

        for name in self.headers.keys() {
            if name.trim().is_empty() {
                anyhow::bail!("Header names in config file cannot be empty");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_config() {
        let file = write_config(r#"{
            "mode": "production",
            "developmentUrl": "http://localhost:5000",
            "productionUrl": "https://recon.internal/api",
            "origin": "https://dash.internal",
            "headers": {"Authorization": "Bearer abc"}
        }"#);

        let config = FileConfig::load(file.path()).unwrap();
        assert_eq!(config.mode.as_deref(), Some("production"));
        assert_eq!(config.production_url.as_deref(), Some("https://recon.internal/api"));
        assert_eq!(config.headers.get("Authorization").map(String::as_str), Some("Bearer abc"));
    }

    #[test]
    fn test_empty_object_is_valid() {
        let file = write_config("{}");
        let config = FileConfig::load(file.path()).unwrap();
        assert!(config.mode.is_none());
        assert!(config.headers.is_empty());
    }

    #[test]
    fn test_validation_invalid_url() {
        let file = write_config(r#"{"productionUrl": "ftp://nope"}"#);
        let err = FileConfig::load(file.path()).unwrap_err();
        assert!(err.to_string().contains("productionUrl"));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_config("{not json");
        assert!(FileConfig::load(file.path()).is_err());
    }
}
