//! HTML link extraction
//!
//! The crawler only needs one capability from an HTML parser: find every
//! anchor element and read its `href` attribute. Targets are returned raw;
//! resolution and filtering happen in the link filter.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::HashSet;

static ANCHOR_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

/// Extracts the raw `href` targets of every anchor in the document
///
/// Empty targets and fragment-only targets (`#section`) are dropped; the
/// result is deduplicated.
///
/// # Example
///
/// ```
/// use sumi_crawl::crawler::extract_links;
///
/// let html = r##"<a href="/about">About</a><a href="#top">Top</a><a href="/about">Again</a>"##;
/// let links = extract_links(html);
/// assert_eq!(links.len(), 1);
/// assert!(links.contains("/about"));
/// ```
pub fn extract_links(html: &str) -> HashSet<String> {
    let document = Html::parse_document(html);

    document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|element| element.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty() && !href.starts_with('#'))
        .map(str::to_string)
        .collect()
}
