//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives one crawl run from a seed URL:
//! - Owning the per-run visited state, scheduler, fetcher and normalizer
//! - Spawning one task per discovered URL on a `JoinSet`
//! - Walking each task through depth, file-type, duplicate and fetch checks
//! - Collecting the crawled set and statistics into a `CrawlReport`

use crate::config::Config;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::filter::filter_internal;
use crate::crawler::scheduler::Scheduler;
use crate::output::{CrawlOutput, CrawlStatistics, StatsRecorder, VisitOutcome};
use crate::state::VisitedState;
use crate::url::{depth_of, is_excluded_file_type, UrlNormalizer};
use crate::CrawlError;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// A unit of crawl work: one URL to visit
///
/// `max_depth` and `base_url` are inherited unchanged by every child task.
/// Depth itself is not carried; it is recomputed from the URL's path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTask {
    pub url: String,
    pub max_depth: usize,
    pub base_url: String,
}

impl CrawlTask {
    pub fn new(url: impl Into<String>, max_depth: usize, base_url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_depth,
            base_url: base_url.into(),
        }
    }

    /// Creates a task for a link discovered by this one
    pub fn child(&self, url: impl Into<String>) -> Self {
        Self::new(url, self.max_depth, self.base_url.clone())
    }
}

/// Result of a completed crawl run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Every successfully crawled canonical URL, mapped to `true`
    pub urls: BTreeMap<String, bool>,
    pub statistics: CrawlStatistics,
}

impl CrawlReport {
    /// The serializable result document
    pub fn output(&self) -> CrawlOutput {
        CrawlOutput {
            urls: self.urls.clone(),
        }
    }

    pub fn crawled_count(&self) -> usize {
        self.urls.len()
    }
}

/// Everything one run's tasks share
#[derive(Debug)]
struct CrawlContext {
    fetcher: Fetcher,
    scheduler: Scheduler,
    visited: VisitedState,
    normalizer: UrlNormalizer,
    stats: StatsRecorder,
}

/// Main crawler coordinator structure
///
/// A coordinator is consumed by [`Coordinator::run`]; every run starts from
/// empty state.
#[derive(Debug)]
pub struct Coordinator {
    ctx: Arc<CrawlContext>,
    max_depth: usize,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// Must be called inside a tokio runtime, since the rate limiter's
    /// ticker is created here.
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - The HTTP client could not be built
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        let fetcher = Fetcher::new(&config.fetch, &config.user_agent)?;
        Ok(Self::with_fetcher(config, fetcher))
    }

    /// Creates a coordinator around an existing fetcher
    pub fn with_fetcher(config: Config, fetcher: Fetcher) -> Self {
        let ctx = CrawlContext {
            fetcher,
            scheduler: Scheduler::new(&config.crawler),
            visited: VisitedState::new(),
            normalizer: UrlNormalizer::new(config.crawler.canonical_scheme),
            stats: StatsRecorder::new(),
        };

        Self {
            ctx: Arc::new(ctx),
            max_depth: config.crawler.max_depth,
        }
    }

    /// Crawls the seed's host and returns the crawled set
    ///
    /// The seed is given the canonical scheme if it has none. Only a seed
    /// that cannot be canonicalized fails the run; every per-URL failure
    /// after that is logged and contained in its own task.
    pub async fn run(self, seed: &str) -> Result<CrawlReport, CrawlError> {
        let seed = self.ctx.normalizer.ensure_scheme(seed.trim());
        self.ctx.normalizer.normalize(&seed, &seed)?;

        tracing::info!(
            "Starting crawl of {} (max depth {}, {} workers)",
            seed,
            self.max_depth,
            self.ctx.scheduler.pool_size()
        );
        self.ctx.stats.mark_started();

        let mut tasks = JoinSet::new();
        let root = CrawlTask::new(seed.clone(), self.max_depth, seed);
        tasks.spawn(visit(Arc::clone(&self.ctx), root));

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(children) => {
                    for child in children {
                        tasks.spawn(visit(Arc::clone(&self.ctx), child));
                    }
                }
                Err(e) => tracing::error!("Crawl task failed: {}", e),
            }
        }

        let statistics = self.ctx.stats.snapshot();
        let urls: BTreeMap<String, bool> = self
            .ctx
            .visited
            .crawled_urls()
            .into_iter()
            .map(|url| (url, true))
            .collect();

        tracing::info!(
            "Crawl completed: {} pages crawled in {}ms",
            urls.len(),
            statistics.duration().num_milliseconds()
        );

        Ok(CrawlReport { urls, statistics })
    }
}

/// Processes a single task and returns the children it discovered
///
/// Every early return is terminal for this task only.
async fn visit(ctx: Arc<CrawlContext>, task: CrawlTask) -> Vec<CrawlTask> {
    let depth = match depth_of(&task.url) {
        Ok(depth) => depth,
        Err(e) => {
            tracing::error!("Failed to compute depth of {}: {}", task.url, e);
            ctx.stats.record(VisitOutcome::Malformed);
            return Vec::new();
        }
    };
    tracing::debug!("Depth of {} is {}", task.url, depth);

    if depth > task.max_depth {
        tracing::info!(
            "Max depth reached for {} (depth {} > {})",
            task.url,
            depth,
            task.max_depth
        );
        ctx.stats.record(VisitOutcome::DepthExceeded);
        return Vec::new();
    }

    if is_excluded_file_type(&task.url) {
        tracing::info!("Skipping excluded file type: {}", task.url);
        ctx.stats.record(VisitOutcome::ExcludedFileType);
        return Vec::new();
    }

    let url = match ctx.normalizer.normalize(&task.url, &task.base_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!("Skipping malformed URL {}: {}", task.url, e);
            ctx.stats.record(VisitOutcome::Malformed);
            return Vec::new();
        }
    };

    if ctx.visited.is_crawled(&url) {
        tracing::info!("Skipping duplicate URL: {}", url);
        ctx.stats.record(VisitOutcome::Duplicate);
        return Vec::new();
    }

    // Held until this function returns
    let _slot = match ctx.scheduler.acquire().await {
        Ok(slot) => slot,
        Err(e) => {
            tracing::error!("Worker pool closed before visiting {}: {}", url, e);
            return Vec::new();
        }
    };

    let links = match ctx.fetcher.fetch_links(&url).await {
        Ok(links) => links,
        Err(e) => {
            tracing::info!("Fetch error for {}: {}", url, e);
            let outcome = if e.is_not_found() {
                VisitOutcome::NotFound
            } else {
                VisitOutcome::FetchFailed
            };
            ctx.stats.record(outcome);
            return Vec::new();
        }
    };

    // Two tasks for the same URL can both pass the duplicate check above;
    // only the first to finish counts the page
    if !ctx.visited.mark_crawled(&url) {
        tracing::info!("Skipping duplicate URL: {}", url);
        ctx.stats.record(VisitOutcome::Duplicate);
        return Vec::new();
    }
    tracing::info!("Crawled {} ({} links)", url, links.len());

    let internal = filter_internal(&task.base_url, &links, &url, &ctx.visited, &ctx.normalizer);
    if internal.is_empty() {
        tracing::info!("No internal links found on {}", url);
        ctx.stats.record(VisitOutcome::LeafPage);
        return Vec::new();
    }
    ctx.stats.record(VisitOutcome::Crawled);

    internal
        .into_iter()
        .filter_map(|link| match ctx.normalizer.normalize(&link, &task.base_url) {
            Ok(normalized) => Some(normalized),
            Err(e) => {
                tracing::debug!("Dropping link {}: {}", link, e);
                None
            }
        })
        .filter(|normalized| !ctx.visited.is_crawled(normalized))
        .map(|normalized| task.child(normalized))
        .collect()
}
