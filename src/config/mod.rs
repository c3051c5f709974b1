//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every setting has a default except the seed URL and page budget,
//! which the binary can also take from flags or an interactive prompt.
//!
//! # Example
//!
//! ```no_run
//! use hostcrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Crawler will use {} permits", config.crawler.concurrency_limit);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, UserAgentConfig, DEFAULT_CONCURRENCY_LIMIT, DEFAULT_FETCH_TIMEOUT_MS,
    DEFAULT_IDLE_CONNECTIONS_PER_HOST,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_seed_url};
