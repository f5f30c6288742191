//! Utilities module
//!
//! Contains error handling, logging helpers, JSON value helpers and
//! presentation formatting

pub mod error;
pub mod format;
pub mod logging;
pub mod value;
