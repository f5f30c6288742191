//! Application configuration settings
//!
//! Defines all configuration structures, the environment loading logic and
//! the base-URL resolution policy used by the HTTP client

use super::file::FileConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::net::IpAddr;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use url::{Host, Url};

/// Default development backend
pub const DEFAULT_DEV_API_URL: &str = "http://localhost:5000";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Runtime the dashboard is running in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RuntimeMode {
    Development,
    Production,
    /// Any other runtime name (test, staging, ...)
    Other(String),
}

impl From<String> for RuntimeMode {
    fn from(value: String) -> Self {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => RuntimeMode::Development,
            "production" | "prod" => RuntimeMode::Production,
            other => RuntimeMode::Other(other.to_string()),
        }
    }
}

impl From<RuntimeMode> for String {
    fn from(mode: RuntimeMode) -> Self {
        mode.to_string()
    }
}

impl From<&str> for RuntimeMode {
    fn from(value: &str) -> Self {
        RuntimeMode::from(value.to_string())
    }
}

impl fmt::Display for RuntimeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeMode::Development => write!(f, "development"),
            RuntimeMode::Production => write!(f, "production"),
            RuntimeMode::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Runtime mode
    pub mode: RuntimeMode,
    /// Base URL used in development and as the fallback
    pub development_url: String,
    /// Base URL used in production when not served from a loopback origin
    pub production_url: Option<String>,
    /// Origin the dashboard is served from
    pub origin: Option<String>,
    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            mode: RuntimeMode::Development,
            development_url: DEFAULT_DEV_API_URL.to_string(),
            production_url: None,
            origin: None,
            headers: HashMap::new(),
        }
    }
}

impl ApiConfig {
    /// Select the base URL for the current runtime
    ///
    /// Development uses the development URL. Production uses the empty
    /// string (same-origin requests) when served from a loopback origin,
    /// otherwise the production URL. Everything else falls back to the
    /// development URL.
    pub fn resolve_base_url(&self) -> String {
        match self.mode {
            RuntimeMode::Development => self.development_url.clone(),
            RuntimeMode::Production => {
                if self.is_loopback_origin() {
                    String::new()
                } else if let Some(url) = &self.production_url {
                    url.clone()
                } else {
                    warn!("No production API URL configured, using development URL");
                    self.development_url.clone()
                }
            }
            RuntimeMode::Other(_) => self.development_url.clone(),
        }
    }

    /// Parsed origin, if one is configured and valid
    pub fn origin_url(&self) -> Option<Url> {
        self.origin.as_deref().and_then(|o| Url::parse(o).ok())
    }

    /// Whether the configured origin points at this machine
    pub fn is_loopback_origin(&self) -> bool {
        self.origin_url()
            .map(|url| is_loopback_host(&url))
            .unwrap_or(false)
    }
}

/// Loopback check on a URL host: `localhost`, `127.0.0.0/8`, `::1`
pub fn is_loopback_host(url: &Url) -> bool {
    match url.host() {
        Some(Host::Domain(domain)) => domain.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
        Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
        None => false,
    }
}

impl Settings {
    /// Create a new configuration instance
    ///
    /// Loads `.env`, then the optional JSON file from the default locations,
    /// then environment variables. Environment values win over file values.
    pub fn new() -> Result<Self> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let file = FileConfig::load_default().context("Failed to load configuration file")?;
        Self::from_env_with(file)
    }

    /// Build settings from the environment on top of an optional file config
    pub fn from_env_with(file: Option<FileConfig>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let mode = env_or(file.mode.clone(), "RECONDASH_MODE")
            .map(RuntimeMode::from)
            .unwrap_or(RuntimeMode::Development);

        let settings = Self {
            api: ApiConfig {
                mode,
                development_url: env_or(file.development_url.clone(), "RECONDASH_DEV_API_URL")
                    .unwrap_or_else(|| DEFAULT_DEV_API_URL.to_string()),
                production_url: env_or(file.production_url.clone(), "RECONDASH_PROD_API_URL"),
                origin: env_or(file.origin.clone(), "RECONDASH_ORIGIN"),
                headers: file.headers.clone(),
            },
            logging: LoggingConfig {
                level: get_env_or_default("RUST_LOG", "info"),
                format: get_env_or_default("LOG_FORMAT", "text"),
            },
        };

        // Validate configuration
        settings.validate()?;

        debug!("Configuration loaded for {} runtime", settings.api.mode);
        Ok(settings)
    }

    /// Validate configuration validity
    pub fn validate(&self) -> Result<()> {
        if !self.api.development_url.starts_with("http") {
            anyhow::bail!(
                "Invalid development API URL format, should start with 'http': {}",
                self.api.development_url
            );
        }

        if let Some(url) = &self.api.production_url {
            if !url.starts_with("http") {
                anyhow::bail!("Invalid production API URL format, should start with 'http': {}", url);
            }
        }

        if let Some(origin) = &self.api.origin {
            Url::parse(origin).with_context(|| format!("Invalid origin: {}", origin))?;
        }

        // Validate log level; full filter directives ("recondash=debug") are also accepted
        let level = self.logging.level.as_str();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        let is_directive = level.contains('=') || level.contains(',');
        if is_directive {
            EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {}", level))?;
        } else if !valid_levels.contains(&level) {
            anyhow::bail!("Invalid log level: {}", level);
        }

        // Validate log format
        let valid_formats = ["text", "json"];
        if !valid_formats.contains(&self.logging.format.as_str()) {
            anyhow::bail!("Invalid log format: {}", self.logging.format);
        }

        Ok(())
    }
}

/// Environment variable if set and non-empty, else the file value
fn env_or(file_value: Option<String>, key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or(file_value)
}

/// Get environment variable or default value
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_config(mode: RuntimeMode, origin: Option<&str>) -> ApiConfig {
        ApiConfig {
            mode,
            development_url: "http://localhost:5000".to_string(),
            production_url: Some("https://recon.internal".to_string()),
            origin: origin.map(|o| o.to_string()),
            headers: HashMap::new(),
        }
    }

    #[test]
    fn test_runtime_mode_parsing() {
        assert_eq!(RuntimeMode::from("Production"), RuntimeMode::Production);
        assert_eq!(RuntimeMode::from("dev"), RuntimeMode::Development);
        assert_eq!(RuntimeMode::from("test"), RuntimeMode::Other("test".to_string()));
    }

    #[test]
    fn test_resolve_base_url() {
        assert_eq!(
            api_config(RuntimeMode::Development, None).resolve_base_url(),
            "http://localhost:5000"
        );
        assert_eq!(
            api_config(RuntimeMode::Production, Some("http://localhost:3000")).resolve_base_url(),
            ""
        );
        assert_eq!(
            api_config(RuntimeMode::Production, Some("https://dash.example.org")).resolve_base_url(),
            "https://recon.internal"
        );
        assert_eq!(
            api_config(RuntimeMode::Other("staging".to_string()), None).resolve_base_url(),
            "http://localhost:5000"
        );
    }

    #[test]
    fn test_loopback_hosts() {
        for origin in ["http://localhost:3000", "http://127.0.0.1", "http://127.1.2.3:8080", "http://[::1]:3000"] {
            let url = Url::parse(origin).unwrap();
            assert!(is_loopback_host(&url), "{} should be loopback", origin);
        }
        let url = Url::parse("http://10.0.0.1").unwrap();
        assert!(!is_loopback_host(&url));
    }
}
