//! Civic-Scout: an open-data portal endpoint scout
//!
//! This crate discovers machine-readable dataset endpoints published on a
//! municipal open-data portal by crawling category pages, dataset listing
//! pages, and per-dataset detail pages, and resolving each detail page to
//! the concrete resource URLs it exposes.

pub mod config;
pub mod extract;
pub mod output;
pub mod pipeline;

use thiserror::Error;

/// Main error type for Civic-Scout operations
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid resource pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Output serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pipeline error: {0}")]
    Pipeline(String),
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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors produced by a single fetch attempt
///
/// Both variants are non-fatal to the stages: a failed fetch for one URL
/// means "no result for that URL", never an aborted batch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Transport error for {url}: {source}")]
    Transport { url: String, source: reqwest::Error },
}

/// Result type alias for Civic-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use extract::{DatasetEntry, LinkRecord, ResourceMatcher};
pub use pipeline::{CategoryMap, EndpointMap, FetchClient, Pipeline, PipelineReport};
