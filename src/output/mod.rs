//! Output module for persisting crawl results and reporting statistics
//!
//! This module handles:
//! - Serializing the set of crawled URLs as JSON
//! - Writing results through an `OutputHandler`
//! - Recording and printing crawl statistics

mod json;
pub mod stats;
mod traits;

pub use json::JsonFileOutput;
pub use stats::{print_statistics, CrawlStatistics, StatsRecorder, VisitOutcome};
pub use traits::{CrawlOutput, OutputHandler, OutputResult};
