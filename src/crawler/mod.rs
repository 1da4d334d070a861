//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML parsing and link extraction
//! - Internal link filtering
//! - Worker pool and rate limiting
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod filter;
mod parser;
mod scheduler;

pub use coordinator::{Coordinator, CrawlReport, CrawlTask};
pub use fetcher::{build_http_client, Fetcher, RetryPolicy, MAX_RETRY};
pub use filter::filter_internal;
pub use parser::extract_links;
pub use scheduler::{Scheduler, WorkerSlot};

use crate::config::Config;
use crate::CrawlError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client, worker pool and rate limiter
/// 2. Visit the seed and every same-host link within the depth limit
/// 3. Return the crawled set with run statistics
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seed` - The URL to start from; its host bounds the crawl
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed
/// * `Err(CrawlError)` - The client could not be built or the seed is unusable
pub async fn crawl(config: Config, seed: &str) -> Result<CrawlReport, CrawlError> {
    Coordinator::new(config)?.run(seed).await
}
