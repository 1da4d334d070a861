use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sumi-Crawl
///
/// Every section is optional in a TOML file; missing sections and keys fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetch: FetchConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Scheme every canonical URL is rewritten to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalScheme {
    #[default]
    Https,
    /// For hosts that only speak plain HTTP, e.g. local test servers
    Http,
}

impl CanonicalScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Https => "https",
            Self::Http => "http",
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum path depth of a URL that will be visited
    pub max_depth: usize,

    /// Maximum number of pages fetched at the same time
    pub worker_pool_size: usize,

    /// Interval between two outbound requests across the whole run (milliseconds)
    pub request_delay_ms: u64,

    pub canonical_scheme: CanonicalScheme,
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            worker_pool_size: 10,
            request_delay_ms: 100,
            canonical_scheme: CanonicalScheme::Https,
        }
    }
}

/// HTTP fetch and retry configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetchConfig {
    /// Per-request timeout (seconds)
    pub timeout_secs: u64,

    /// Total attempts per URL, including the first one
    pub max_attempts: u32,

    /// Backoff before the second attempt (milliseconds); doubles afterwards
    pub retry_base_delay_ms: u64,

    /// Upper bound of the un-jittered backoff (milliseconds)
    pub retry_max_delay_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_attempts: crate::crawler::MAX_RETRY,
            retry_base_delay_ms: 500,
            retry_max_delay_ms: 5_000,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserAgentConfig {
    /// Name of the crawler
    pub crawler_name: String,

    /// Version of the crawler
    pub crawler_version: String,

    /// URL with information about the crawler
    pub contact_url: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiCrawl".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://github.com/sumi-crawl/sumi-crawl".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path of the JSON result file
    pub path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "output.json".to_string(),
        }
    }
}
