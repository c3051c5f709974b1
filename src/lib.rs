//! hostcrawl: a same-host web crawler
//!
//! Starting from a seed URL, this crate discovers and visits linked pages on the
//! seed's host under robots.txt. Each canonical URL is visited at most once and
//! the number of pages is capped by a fixed budget.

pub mod config;
pub mod crawler;
pub mod output;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl setup and execution
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid seed URL: {0}")]
    Seed(#[from] LinkError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

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

/// Reasons an href cannot become a crawlable URL
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// Empty, fragment-only, or `mailto:`/`tel:` href
    #[error("Invalid link: {0}")]
    InvalidLink(String),

    /// The href or the base URL could not be parsed
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    /// The href names a scheme other than http or https
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),
}

/// Page or robots.txt fetch failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for link normalization
pub type LinkResult<T> = std::result::Result<T, LinkError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlSettings, Crawler};
pub use output::CrawlReport;
pub use state::{ClaimOutcome, UnitState, VisitLedger};
pub use crate::url::normalize_link;
