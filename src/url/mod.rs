//! URL handling module
//!
//! This module resolves hrefs into canonical crawl URLs and answers host
//! questions (same-host filtering, robots.txt location).

mod host;
mod normalize;

// Re-export main functions
pub use host::{host_key, is_same_host, robots_url};
pub use normalize::{normalize_link, normalize_seed};
