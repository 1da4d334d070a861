use url::Url;

/// Extracts the lowercase host of a URL string
///
/// Ports are not part of the host, so `https://example.com:8080/` and
/// `https://example.com/` share the host `example.com`.
///
/// # Returns
///
/// * `Some(String)` - The lowercase host
/// * `None` - If the string does not parse or has no host
///
/// # Examples
///
/// ```
/// use sumi_crawl::url::extract_host;
///
/// assert_eq!(extract_host("https://EXAMPLE.COM/path"), Some("example.com".to_string()));
/// assert_eq!(extract_host("https://sub.example.com/path"), Some("sub.example.com".to_string()));
/// assert_eq!(extract_host("/relative"), None);
/// ```
pub fn extract_host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(|h| h.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_simple_host() {
        assert_eq!(
            extract_host("https://example.com/"),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_extract_subdomain() {
        assert_eq!(
            extract_host("https://blog.example.com/post"),
            Some("blog.example.com".to_string())
        );
    }

    #[test]
    fn test_extract_with_port() {
        assert_eq!(
            extract_host("http://127.0.0.1:8080/"),
            Some("127.0.0.1".to_string())
        );
    }

    #[test]
    fn test_extract_mixed_case() {
        assert_eq!(
            extract_host("https://Example.COM/"),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_extract_invalid() {
        assert_eq!(extract_host("not a url"), None);
        assert_eq!(extract_host(""), None);
    }
}
