//! Robots.txt policy evaluation
//!
//! This module wraps the robotstxt crate's matcher behind a cheap, clonable
//! policy value holding the raw robots.txt text.

use robotstxt::DefaultMatcher;
use std::sync::Arc;

/// Raw robots.txt text for one host
///
/// Empty text places no restrictions. Clones share the same buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotsPolicy {
    content: Arc<str>,
}

impl Default for RobotsPolicy {
    fn default() -> Self {
        Self::from_content("")
    }
}

impl RobotsPolicy {
    /// Creates a policy from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: Arc::from(content),
        }
    }

    /// Creates a permissive policy that allows everything
    ///
    /// This is used when robots.txt cannot be fetched.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Returns the raw robots.txt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to check
    /// * `user_agent` - The product token matched against `User-agent` groups
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed
    /// * `false` - If the URL is disallowed
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}
