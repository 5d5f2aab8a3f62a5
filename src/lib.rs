//! Pixelsweep: a broken-image link checker
//!
//! This crate implements a single-domain website crawler that discovers
//! pages, extracts image references from HTML and linked stylesheets,
//! verifies each image URL, and reports broken or redirected images.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod http;
pub mod report;
pub mod state;
pub mod url;
pub mod verify;

use thiserror::Error;

/// Main error type for pixelsweep operations
///
/// Transport-level failures (timeouts, connection errors, DNS errors)
/// are deliberately absent here: the HTTP adapter absorbs them and
/// reports "no result" instead, so a single unreachable URL never
/// aborts a crawl.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid start URL: {0}")]
    InvalidStartUrl(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for pixelsweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::Crawler;
pub use state::{CancelToken, CrawlState, Finding};
