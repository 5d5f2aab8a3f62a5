//! Stylesheet URL extraction
//!
//! Scans raw CSS text for `url(...)` references and resolves them to
//! absolute URLs. Inline-encoded `data:` URLs are not fetchable and
//! are dropped here.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static CSS_URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"url\(([^)]*)\)").expect("valid css url pattern"));

/// Extracts every fetchable URL referenced from CSS text
///
/// Each `url(...)` occurrence is unwrapped, stripped of surrounding
/// quotes and whitespace, and resolved against `base_url`. Duplicates
/// are permitted at this layer; deduplication happens when the asset
/// extractor unions everything into one set.
pub fn extract_css_urls(css_text: &str, base_url: &Url) -> Vec<Url> {
    let mut urls = Vec::new();

    for captures in CSS_URL_PATTERN.captures_iter(css_text) {
        let raw = captures[1].trim_matches(|c: char| c == '\'' || c == '"' || c.is_whitespace());

        if raw.is_empty() || raw.starts_with("data:") {
            continue;
        }

        if let Ok(resolved) = base_url.join(raw) {
            urls.push(resolved);
        }
    }

    urls
}
