use std::collections::HashSet;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
struct VisitedSets {
    crawled_urls: HashSet<String>,
    visited_paths: HashSet<String>,
}

/// Tracks what one crawl run has already seen
///
/// Holds two sets behind a single read-write lock:
///
/// - `crawled_urls`: canonical URLs that have been fetched and expanded
/// - `visited_paths`: paths already handed out by the link filter, used to
///   suppress links that lead back to a page or one of its ancestors
///
/// Every method is individually atomic. Callers doing `is_crawled` followed
/// by `mark_crawled` may race with another task doing the same for the same
/// URL; both may fetch it, which wastes work but never corrupts the sets.
/// Entries are never removed.
#[derive(Debug, Default)]
pub struct VisitedState {
    inner: RwLock<VisitedSets>,
}

impl VisitedState {
    /// Creates an empty tracker for a new run
    pub fn new() -> Self {
        Self::default()
    }

    // The sets only ever grow, so data behind a poisoned lock is still usable
    fn read(&self) -> RwLockReadGuard<'_, VisitedSets> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, VisitedSets> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns true if the canonical URL has already been crawled
    pub fn is_crawled(&self, url: &str) -> bool {
        self.read().crawled_urls.contains(url)
    }

    /// Records a canonical URL as crawled
    ///
    /// Returns true if the URL was not recorded before.
    pub fn mark_crawled(&self, url: &str) -> bool {
        self.write().crawled_urls.insert(url.to_string())
    }

    /// Returns true if the path has already been handed out
    pub fn is_visited_path(&self, path: &str) -> bool {
        self.read().visited_paths.contains(path)
    }

    /// Records a path as visited
    ///
    /// Returns true if the path was not recorded before, which makes this an
    /// atomic insert-if-absent.
    pub fn mark_visited_path(&self, path: &str) -> bool {
        self.write().visited_paths.insert(path.to_string())
    }

    /// Number of crawled URLs
    pub fn crawled_count(&self) -> usize {
        self.read().crawled_urls.len()
    }

    /// Sorted snapshot of the crawled URLs
    pub fn crawled_urls(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.read().crawled_urls.iter().cloned().collect();
        urls.sort();
        urls
    }
}
