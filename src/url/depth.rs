use crate::UrlError;
use url::{ParseError, Url};

/// File extensions that are never fetched as HTML pages
const EXCLUDED_FILE_TYPES: &[&str] = &[
    "pdf", "jpg", "jpeg", "png", "gif", "svg", "webp", "ico", "doc", "docx", "xls", "xlsx", "ppt",
    "pptx", "zip", "gz", "mp3", "mp4",
];

/// Counts the non-empty path segments of a URL
///
/// Depth is purely a function of the path: query strings, fragments and
/// repeated or trailing slashes never change it. A root-relative path such
/// as `/a/b` is accepted as well as an absolute URL.
///
/// # Examples
///
/// ```
/// use sumi_crawl::url::depth_of;
///
/// assert_eq!(depth_of("https://example.com").unwrap(), 0);
/// assert_eq!(depth_of("https://example.com/a/b").unwrap(), 2);
/// assert_eq!(depth_of("https://example.com//a///b/?q=1").unwrap(), 2);
/// ```
pub fn depth_of(url: &str) -> Result<usize, UrlError> {
    let path = extract_path(url)?;
    Ok(path.split('/').filter(|segment| !segment.is_empty()).count())
}

/// Returns true if the URL points at a document or media file that is not
/// worth expanding as HTML
///
/// # Examples
///
/// ```
/// use sumi_crawl::url::is_excluded_file_type;
///
/// assert!(is_excluded_file_type("https://example.com/report.PDF"));
/// assert!(!is_excluded_file_type("https://example.com/index.html"));
/// ```
pub fn is_excluded_file_type(url: &str) -> bool {
    let Ok(path) = extract_path(url) else {
        return false;
    };

    let last_segment = path.rsplit('/').next().unwrap_or_default();
    match last_segment.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => {
            let extension = extension.to_ascii_lowercase();
            EXCLUDED_FILE_TYPES.contains(&extension.as_str())
        }
        _ => false,
    }
}

/// Returns the path component of an absolute URL or root-relative path
pub fn extract_path(url: &str) -> Result<String, UrlError> {
    match Url::parse(url.trim()) {
        Ok(parsed) => Ok(parsed.path().to_string()),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let path = url
                .trim()
                .split(['?', '#'])
                .next()
                .unwrap_or_default();
            Ok(path.to_string())
        }
        Err(e) => Err(UrlError::Parse(format!("{}: {}", url, e))),
    }
}
