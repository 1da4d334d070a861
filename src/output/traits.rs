//! Output handler traits and types
//!
//! This module defines the trait interface for result sinks and the
//! serialized shape of a crawl result.

use crate::OutputError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// The persisted result of a crawl
///
/// Serializes as `{ "urls": { "<canonical url>": true, ... } }`. Keys are
/// kept sorted so repeated runs over the same site produce identical files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlOutput {
    pub urls: BTreeMap<String, bool>,
}

impl CrawlOutput {
    /// Builds an output document from a list of crawled URLs
    pub fn from_urls<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(|url| (url.into(), true)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Pretty-printed JSON form of the output
    pub fn to_json_pretty(&self) -> OutputResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Trait for output handlers
///
/// Output handlers persist the final crawl result. A failed write is
/// reported to the caller and never retried.
pub trait OutputHandler {
    /// Writes the crawl result
    ///
    /// # Arguments
    ///
    /// * `output` - The crawl result to persist
    fn write(&self, output: &CrawlOutput) -> OutputResult<()>;
}
