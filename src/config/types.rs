use serde::Deserialize;

/// Default number of units of work allowed to fetch at once
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 200;

/// Default per-request timeout (milliseconds)
pub const DEFAULT_FETCH_TIMEOUT_MS: u64 = 3_000;

/// Default number of idle pooled connections kept per host
pub const DEFAULT_IDLE_CONNECTIONS_PER_HOST: usize = 100;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Absolute http(s) URL the crawl starts from
    #[serde(rename = "seed-url", default)]
    pub seed_url: Option<String>,

    /// Maximum number of pages to claim, seed included
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<usize>,

    /// Maximum number of units fetching or parsing at once
    #[serde(rename = "concurrency-limit", default = "default_concurrency_limit")]
    pub concurrency_limit: usize,

    /// Timeout applied to every page and robots.txt fetch (milliseconds)
    #[serde(rename = "fetch-timeout-ms", default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Idle connections kept open per host for reuse
    #[serde(
        rename = "idle-connections-per-host",
        default = "default_idle_connections_per_host"
    )]
    pub idle_connections_per_host: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            seed_url: None,
            max_pages: None,
            concurrency_limit: DEFAULT_CONCURRENCY_LIMIT,
            fetch_timeout_ms: DEFAULT_FETCH_TIMEOUT_MS,
            idle_connections_per_host: DEFAULT_IDLE_CONNECTIONS_PER_HOST,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler; also the token matched against robots.txt groups
    #[serde(default = "default_crawler_name")]
    pub name: String,

    /// Version of the crawler
    #[serde(default = "default_crawler_version")]
    pub version: String,
}

impl UserAgentConfig {
    /// The `User-Agent` header value, `name/version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.name, self.version)
    }

    /// The product token evaluated against robots.txt
    pub fn robots_token(&self) -> &str {
        &self.name
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: default_crawler_name(),
            version: default_crawler_version(),
        }
    }
}

fn default_concurrency_limit() -> usize {
    DEFAULT_CONCURRENCY_LIMIT
}

fn default_fetch_timeout_ms() -> u64 {
    DEFAULT_FETCH_TIMEOUT_MS
}

fn default_idle_connections_per_host() -> usize {
    DEFAULT_IDLE_CONNECTIONS_PER_HOST
}

fn default_crawler_name() -> String {
    "MyCrawler".to_string()
}

fn default_crawler_version() -> String {
    "1.0".to_string()
}
