//! Crawl statistics
//!
//! Tasks record the outcome of every visit into a shared `StatsRecorder`;
//! at the end of a run it is frozen into a `CrawlStatistics` snapshot that
//! is logged and printed.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// How a single crawl task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitOutcome {
    /// Fetched and expanded, with at least one new internal link
    Crawled,
    /// Fetched and expanded, but no new internal links survived filtering
    LeafPage,
    DepthExceeded,
    ExcludedFileType,
    /// Depth or canonical form could not be computed
    Malformed,
    Duplicate,
    NotFound,
    /// Retries exhausted or request could not be built
    FetchFailed,
}

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrawlStatistics {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Pages fetched and expanded (including leaf pages)
    pub pages_crawled: u64,

    /// Crawled pages that contributed no new internal links
    pub leaf_pages: u64,

    pub depth_exceeded: u64,
    pub excluded_file_type: u64,
    pub malformed: u64,
    pub duplicates: u64,
    pub not_found: u64,
    pub fetch_failures: u64,
}

impl CrawlStatistics {
    /// Wall-clock duration of the run
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    /// Total number of tasks that ran
    pub fn total_tasks(&self) -> u64 {
        self.pages_crawled
            + self.depth_exceeded
            + self.excluded_file_type
            + self.malformed
            + self.duplicates
            + self.not_found
            + self.fetch_failures
    }
}

/// Thread-safe outcome counters for one run
#[derive(Debug)]
pub struct StatsRecorder {
    started_at: Mutex<DateTime<Utc>>,
    crawled: AtomicU64,
    leaf_pages: AtomicU64,
    depth_exceeded: AtomicU64,
    excluded_file_type: AtomicU64,
    malformed: AtomicU64,
    duplicates: AtomicU64,
    not_found: AtomicU64,
    fetch_failures: AtomicU64,
}

impl Default for StatsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsRecorder {
    pub fn new() -> Self {
        Self {
            started_at: Mutex::new(Utc::now()),
            crawled: AtomicU64::new(0),
            leaf_pages: AtomicU64::new(0),
            depth_exceeded: AtomicU64::new(0),
            excluded_file_type: AtomicU64::new(0),
            malformed: AtomicU64::new(0),
            duplicates: AtomicU64::new(0),
            not_found: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
        }
    }

    /// Resets the start timestamp to now
    pub fn mark_started(&self) {
        let mut started_at = self
            .started_at
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *started_at = Utc::now();
    }

    pub fn record(&self, outcome: VisitOutcome) {
        let counter = match outcome {
            VisitOutcome::Crawled => &self.crawled,
            VisitOutcome::LeafPage => {
                self.crawled.fetch_add(1, Ordering::Relaxed);
                &self.leaf_pages
            }
            VisitOutcome::DepthExceeded => &self.depth_exceeded,
            VisitOutcome::ExcludedFileType => &self.excluded_file_type,
            VisitOutcome::Malformed => &self.malformed,
            VisitOutcome::Duplicate => &self.duplicates,
            VisitOutcome::NotFound => &self.not_found,
            VisitOutcome::FetchFailed => &self.fetch_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Freezes the counters, stamping the finish time
    pub fn snapshot(&self) -> CrawlStatistics {
        let started_at = *self
            .started_at
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        CrawlStatistics {
            started_at,
            finished_at: Utc::now(),
            pages_crawled: self.crawled.load(Ordering::Relaxed),
            leaf_pages: self.leaf_pages.load(Ordering::Relaxed),
            depth_exceeded: self.depth_exceeded.load(Ordering::Relaxed),
            excluded_file_type: self.excluded_file_type.load(Ordering::Relaxed),
            malformed: self.malformed.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
        }
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is reserved for the JSON result.
pub fn print_statistics(stats: &CrawlStatistics) {
    eprintln!("=== Crawl Statistics ===\n");
    eprintln!("  Started:  {}", stats.started_at.to_rfc3339());
    eprintln!("  Finished: {}", stats.finished_at.to_rfc3339());
    eprintln!(
        "  Duration: {:.2}s",
        stats.duration().num_milliseconds() as f64 / 1000.0
    );
    eprintln!();
    eprintln!("  Pages crawled:        {}", stats.pages_crawled);
    eprintln!("    of which leaf pages: {}", stats.leaf_pages);
    eprintln!("  Depth exceeded:       {}", stats.depth_exceeded);
    eprintln!("  Excluded file types:  {}", stats.excluded_file_type);
    eprintln!("  Malformed URLs:       {}", stats.malformed);
    eprintln!("  Duplicates:           {}", stats.duplicates);
    eprintln!("  Not found (404):      {}", stats.not_found);
    eprintln!("  Fetch failures:       {}", stats.fetch_failures);
}
