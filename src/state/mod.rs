//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `VisitedState`: per-run record of crawled URLs and visited paths,
//!   shared by every task of that run

mod visited;

pub use visited::VisitedState;
