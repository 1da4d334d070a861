//! Sumi-Crawl: a bounded, polite web crawler
//!
//! This crate walks a single host starting from a seed URL, following
//! same-host links up to a maximum path depth. Concurrency is bounded by a
//! worker pool, outbound requests are paced by a shared rate limiter, and
//! transient network failures are retried with jittered exponential backoff.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

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

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Invalid base URL: {0}")]
    InvalidBase(String),

    #[error("Failed to parse URL: {0}")]
    Parse(String),
}

/// Errors produced while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered 404; never retried
    #[error("404 Not Found: {url}")]
    NotFound { url: String },

    /// Every attempt failed; carries the last failure
    #[error("Request to {url} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        url: String,
        attempts: u32,
        source: AttemptFailure,
    },

    #[error("Could not build request for {url}: {source}")]
    Request { url: String, source: reqwest::Error },
}

impl FetchError {
    /// Returns true if the failure was a 404
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Why a single fetch attempt failed
#[derive(Debug, Error)]
pub enum AttemptFailure {
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl AttemptFailure {
    /// The HTTP status of the failed attempt, if a response arrived
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::Status(status) => Some(*status),
            Self::Transport(e) => e.status(),
        }
    }
}

/// Errors writing crawl results
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write output to {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for Sumi-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlReport, CrawlTask};
pub use state::VisitedState;
pub use url::{depth_of, is_excluded_file_type, normalize_url, UrlNormalizer};
