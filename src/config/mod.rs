//! Configuration management module
//!
//! Responsible for loading and managing application configuration, including
//! environment variables, the optional configuration file and base-URL selection.

pub mod file;
pub mod settings;

pub use file::FileConfig;
pub use settings::{ApiConfig, LoggingConfig, RuntimeMode, Settings};
