//! URL handling for pixelsweep
//!
//! This module provides scheme validation, domain extraction, crawl
//! scoping, and non-page extension detection.

use url::Url;

/// Returns true if the URL uses a crawlable scheme (http or https)
///
/// Any other scheme (ftp, mailto, javascript after resolution, ...)
/// is skipped by the crawl engine without a report entry.
pub fn is_supported_scheme(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use pixelsweep::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if a link stays within the crawl's scope
///
/// A link is in scope when its host is absent (relative references
/// resolved against the current page stay on-site) or when the host
/// contains the crawl domain as a substring, so `cdn.example.com`
/// remains in scope while crawling `example.com`.
pub fn in_crawl_scope(url: &Url, domain: &str) -> bool {
    match url.host_str() {
        None => true,
        Some(host) => host.to_lowercase().contains(domain),
    }
}

/// Returns true if the URL path ends with one of the given non-page
/// extensions (compared case-insensitively)
pub fn has_skip_extension(url: &Url, extensions: &[String]) -> bool {
    let path = url.path().to_lowercase();
    extensions.iter().any(|ext| path.ends_with(ext.as_str()))
}
