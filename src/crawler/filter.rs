//! Internal link filtering
//!
//! Narrows the raw anchor targets of a page to canonical URLs that stay on
//! the crawl's host and do not lead back to a path that has already been
//! handed out.

use crate::state::VisitedState;
use crate::url::{extract_host, extract_path, UrlNormalizer};
use std::collections::HashSet;

/// Filters raw links down to internal, non-recursive canonical URLs
///
/// # Filtering Steps
///
/// 1. Give `base_url` the canonical scheme if it has none
/// 2. Record the parent page's own path as visited, so links back to the
///    page itself are treated as recursive
/// 3. For every raw link:
///    - normalize it against `parent_url`; skip it if that fails
///    - drop it if its host differs from the base host (subdomains included)
///    - drop it if its path was already visited; otherwise record the path
///      and keep the link
///
/// The order of the returned links is not significant.
///
/// # Arguments
///
/// * `base_url` - The seed URL of the crawl, which fixes the allowed host
/// * `raw_links` - Anchor targets as found in the page
/// * `parent_url` - Canonical URL of the page the links came from
/// * `visited` - The run's visited state
/// * `normalizer` - The run's normalizer
pub fn filter_internal(
    base_url: &str,
    raw_links: &HashSet<String>,
    parent_url: &str,
    visited: &VisitedState,
    normalizer: &UrlNormalizer,
) -> Vec<String> {
    let base_url = normalizer.ensure_scheme(base_url);
    let Some(base_host) = extract_host(&base_url) else {
        tracing::error!("Cannot determine host of base URL {}", base_url);
        return Vec::new();
    };

    if let Ok(parent_path) = extract_path(parent_url) {
        visited.mark_visited_path(&parent_path);
    }

    let mut internal = Vec::new();

    for link in raw_links {
        let normalized = match normalizer.normalize(link, parent_url) {
            Ok(normalized) => normalized,
            Err(e) => {
                tracing::debug!("Ignoring link {} on {}: {}", link, parent_url, e);
                continue;
            }
        };

        if extract_host(&normalized).as_deref() != Some(base_host.as_str()) {
            tracing::debug!("Ignoring external or subdomain URL: {}", normalized);
            continue;
        }

        let Ok(path) = extract_path(&normalized) else {
            continue;
        };

        if !visited.mark_visited_path(&path) {
            tracing::debug!("Ignoring recursive link: {}", normalized);
            continue;
        }

        tracing::debug!("Added internal URL: {}", normalized);
        internal.push(normalized);
    }

    internal
}
