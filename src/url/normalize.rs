use crate::config::CanonicalScheme;
use crate::UrlError;
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

/// Absolute URL: optional http(s) scheme, a dotted host, IPv4 or bracketed
/// IPv6 address, an optional port and an optional path
static ABSOLUTE_URL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(((?i)https?)://)?(([a-zA-Z0-9.-]+\.[a-zA-Z]{2,})|(\d{1,3}(\.\d{1,3}){3})|(\[[a-fA-F0-9:]+\]))(:[0-9]{1,5})?(/.*)?$",
    )
    .expect("absolute URL pattern is valid")
});

/// Root-relative path without query or fragment
static RELATIVE_PATH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/[^?#]*$").expect("relative path pattern is valid"));

/// Rewrites URLs into their canonical, deduplication-key form
///
/// A normalizer is cheap to copy; each crawl run builds one from its
/// configured canonical scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlNormalizer {
    scheme: CanonicalScheme,
}

impl UrlNormalizer {
    pub fn new(scheme: CanonicalScheme) -> Self {
        Self { scheme }
    }

    /// The scheme every canonical URL carries
    pub fn scheme(&self) -> &'static str {
        self.scheme.as_str()
    }

    /// Normalizes `link`, resolving it against `base_url` when relative
    ///
    /// # Normalization Steps
    ///
    /// 1. Reject anything that is neither an absolute http(s) URL nor a
    ///    root-relative path without query or fragment
    /// 2. Scheme-less input containing a dot is a bare domain (`example.com/x`)
    ///    and is read as `http://example.com/x`; other scheme-less input is
    ///    resolved against `base_url`
    /// 3. Reject ports outside 1-65535
    /// 4. Force the canonical scheme
    /// 5. Drop fragment and query
    /// 6. Remove trailing slashes (`https://example.com/` becomes
    ///    `https://example.com`)
    ///
    /// The result is idempotent: normalizing a canonical URL returns it
    /// unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_crawl::url::UrlNormalizer;
    ///
    /// let normalizer = UrlNormalizer::default();
    /// let url = normalizer
    ///     .normalize("http://example.com/blog/?page=2#top", "https://example.com")
    ///     .unwrap();
    /// assert_eq!(url, "https://example.com/blog");
    ///
    /// let url = normalizer.normalize("/about", "https://example.com").unwrap();
    /// assert_eq!(url, "https://example.com/about");
    /// ```
    pub fn normalize(&self, link: &str, base_url: &str) -> Result<String, UrlError> {
        let link = link.trim();

        if !ABSOLUTE_URL_PATTERN.is_match(link) && !RELATIVE_PATH_PATTERN.is_match(link) {
            return Err(UrlError::InvalidFormat(link.to_string()));
        }

        let mut url = if has_http_scheme(link) {
            Url::parse(link).map_err(|e| invalid_format(link, e))?
        } else if link.contains('.') && !link.starts_with('/') {
            Url::parse(&format!("http://{}", link)).map_err(|e| invalid_format(link, e))?
        } else {
            let base = Url::parse(base_url)
                .map_err(|e| UrlError::InvalidBase(format!("{}: {}", base_url, e)))?;
            base.join(link).map_err(|e| invalid_format(link, e))?
        };

        // The url crate already rejects ports above 65535
        if url.port() == Some(0) {
            return Err(UrlError::InvalidFormat(format!("{}: port 0", link)));
        }

        if url.host_str().map_or(true, str::is_empty) {
            return Err(UrlError::InvalidFormat(format!("{}: missing host", link)));
        }

        url.set_scheme(self.scheme())
            .map_err(|()| UrlError::InvalidFormat(format!("{}: cannot set scheme", link)))?;
        if url.port().is_some() && url.port() == default_port(self.scheme()) {
            url.set_port(None)
                .map_err(|()| UrlError::InvalidFormat(format!("{}: cannot drop port", link)))?;
        }
        url.set_fragment(None);
        url.set_query(None);

        // With query and fragment gone the serialization ends with the path
        Ok(url.as_str().trim_end_matches('/').to_string())
    }

    /// Prefixes the canonical scheme to a URL that has none
    pub fn ensure_scheme(&self, url: &str) -> String {
        ensure_scheme(url, self.scheme())
    }
}

/// Normalizes `link` against `base_url` using the default `https` scheme
///
/// # Examples
///
/// ```
/// use sumi_crawl::url::normalize_url;
///
/// assert_eq!(
///     normalize_url("HTTP://Example.com/a/../b/", "https://example.com").unwrap(),
///     "https://example.com/b"
/// );
/// assert!(normalize_url("mailto:someone@example.com", "https://example.com").is_err());
/// ```
pub fn normalize_url(link: &str, base_url: &str) -> Result<String, UrlError> {
    UrlNormalizer::default().normalize(link, base_url)
}

/// Prefixes `scheme://` to `url` unless it already carries a scheme
pub fn ensure_scheme(url: &str, scheme: &str) -> String {
    let url = url.trim();
    if url.contains("://") {
        url.to_string()
    } else {
        format!("{}://{}", scheme, url.trim_start_matches('/'))
    }
}

fn has_http_scheme(link: &str) -> bool {
    let lower = link.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "https" => Some(443),
        "http" => Some(80),
        _ => None,
    }
}

fn invalid_format(link: &str, error: url::ParseError) -> UrlError {
    UrlError::InvalidFormat(format!("{}: {}", link, error))
}
