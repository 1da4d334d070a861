//! URL handling module for Sumi-Crawl
//!
//! This module provides URL canonicalization, path depth calculation,
//! file-type exclusion and host extraction. Everything here is a pure
//! function of its inputs; none of it depends on crawl history.

mod depth;
mod domain;
mod normalize;

pub use depth::{depth_of, extract_path, is_excluded_file_type};
pub use domain::extract_host;
pub use normalize::{ensure_scheme, normalize_url, UrlNormalizer};
