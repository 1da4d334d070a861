//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with a descriptive user agent and timeout
//! - GET requests with bounded retries
//! - Exponential backoff with multiplicative jitter between attempts
//! - Error classification (404 short-circuit, retryable failures)
//! - Link extraction from HTML responses

use crate::config::{FetchConfig, UserAgentConfig};
use crate::crawler::parser::extract_links;
use crate::{AttemptFailure, FetchError};
use rand::Rng;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode};
use std::collections::HashSet;
use std::time::Duration;

/// Default number of attempts per URL, including the first request
pub const MAX_RETRY: u32 = 3;

/// Backoff policy between fetch attempts
///
/// The un-jittered delay after failed attempt `n` (1-based) is
/// `base_delay * 2^(n-1)`, capped at `max_delay`. Jitter then adds a random
/// share of 50% to 100% of that delay on top, so concurrent fetches that
/// failed together do not retry in lockstep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
        }
    }

    /// Capped exponential delay after failed attempt `attempt` (1-based)
    pub fn base_backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base_delay
            .checked_mul(1u32 << exponent)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }

    /// Backoff plus `factor` times itself; `factor` is clamped to [0.5, 1.0]
    pub fn delay_with_factor(&self, attempt: u32, factor: f64) -> Duration {
        let base = self.base_backoff(attempt);
        base + base.mul_f64(factor.clamp(0.5, 1.0))
    }

    /// Backoff with a random jitter factor
    pub fn jittered_delay(&self, attempt: u32) -> Duration {
        let factor = rand::thread_rng().gen_range(0.5..=1.0);
        self.delay_with_factor(attempt, factor)
    }
}

/// Builds an HTTP client with proper configuration
///
/// The user agent has the form `CrawlerName/Version (+ContactURL)` and every
/// request is bounded by the configured timeout.
///
/// # Example
///
/// ```no_run
/// use sumi_crawl::config::{FetchConfig, UserAgentConfig};
/// use sumi_crawl::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default(), &UserAgentConfig::default()).unwrap();
/// ```
pub fn build_http_client(
    fetch: &FetchConfig,
    user_agent: &UserAgentConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(fetch.timeout_secs))
        .connect_timeout(Duration::from_secs(fetch.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Outcome of one attempt, before the retry loop decides what to do
enum Attempt {
    Page(Option<String>),
    NotFound,
    Retry(AttemptFailure),
    Fatal(reqwest::Error),
}

/// Fetches pages and extracts their outbound links
///
/// One fetcher is built per crawl run and shared by all of its tasks; the
/// underlying client pools connections.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    retry: RetryPolicy,
}

impl Fetcher {
    /// Creates a fetcher from configuration
    pub fn new(fetch: &FetchConfig, user_agent: &UserAgentConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(fetch, user_agent)?;
        Ok(Self::with_client(client, RetryPolicy::from_config(fetch)))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Fetches a page and returns the raw targets of its anchors
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Return links immediately |
    /// | HTTP 404 | Immediate `FetchError::NotFound` |
    /// | Other status | Retry after backoff |
    /// | Network error / timeout | Retry after backoff |
    /// | Body read failure | Retry after backoff |
    /// | Attempts exhausted | `FetchError::RetriesExhausted` with the last failure |
    ///
    /// A successful response that is not HTML yields an empty set.
    pub async fn fetch_links(&self, url: &str) -> Result<HashSet<String>, FetchError> {
        let page = self.fetch_page(url).await?;
        Ok(page.as_deref().map(extract_links).unwrap_or_default())
    }

    /// Fetches a page body with retries
    ///
    /// Returns `Ok(None)` when the response is not HTML.
    pub async fn fetch_page(&self, url: &str) -> Result<Option<String>, FetchError> {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            tracing::debug!(
                "Requesting URL (attempt {}/{}): {}",
                attempt,
                max_attempts,
                url
            );

            match self.attempt(url).await {
                Attempt::Page(page) => return Ok(page),
                Attempt::NotFound => {
                    tracing::info!("404 Not Found: {}", url);
                    return Err(FetchError::NotFound {
                        url: url.to_string(),
                    });
                }
                Attempt::Fatal(source) => {
                    return Err(FetchError::Request {
                        url: url.to_string(),
                        source,
                    });
                }
                Attempt::Retry(failure) => {
                    if attempt >= max_attempts {
                        return Err(FetchError::RetriesExhausted {
                            url: url.to_string(),
                            attempts: attempt,
                            source: failure,
                        });
                    }

                    let delay = self.retry.jittered_delay(attempt);
                    tracing::info!(
                        "Retrying URL after failure (attempt {}/{}, waiting {:?}): {}: {}",
                        attempt,
                        max_attempts,
                        delay,
                        url,
                        failure
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(&self, url: &str) -> Attempt {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) if e.is_builder() => return Attempt::Fatal(e),
            Err(e) => return Attempt::Retry(AttemptFailure::Transport(e)),
        };

        // Unsuccessful responses are dropped right here, which releases
        // their connection instead of leaving the body unread
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Attempt::NotFound;
        }
        if !status.is_success() {
            return Attempt::Retry(AttemptFailure::Status(status));
        }

        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(true, |content_type| content_type.contains("html"));

        if !is_html {
            tracing::debug!("Skipping non-HTML response from {}", url);
            return Attempt::Page(None);
        }

        match response.text().await {
            Ok(body) => Attempt::Page(Some(body)),
            Err(e) => Attempt::Retry(AttemptFailure::Transport(e)),
        }
    }
}
