//! Image verification
//!
//! Determines whether an image URL is broken, with per-URL memoization:
//! the first verification result is authoritative for the whole run,
//! and later sightings only extend the set of referencing pages.

use crate::http::{HttpClient, Redirects};
use crate::state::{CrawlState, Finding, ImageRecord};
use reqwest::Method;

/// Verifies image URLs against the memo held in [`CrawlState`]
pub struct ImageVerifier<'a> {
    http: &'a HttpClient,
}

impl<'a> ImageVerifier<'a> {
    pub fn new(http: &'a HttpClient) -> Self {
        Self { http }
    }

    /// Checks one image reference from one page
    ///
    /// An already-memoized URL records the new referencing page and
    /// returns `false` without re-verification, regardless of its
    /// stored status; the engine reported it the first time.
    ///
    /// A fresh URL is probed with a no-follow HEAD first: a 3xx with a
    /// Location target is recorded as a redirect anomaly and counts as
    /// broken. Otherwise a redirect-following HEAD decides: no result
    /// or status >= 400 is broken. The Content-Length of the verifying
    /// response is cached for the final size summary.
    pub async fn is_broken(
        &self,
        state: &mut CrawlState,
        image_url: &str,
        page_url: &str,
    ) -> bool {
        if let Some(record) = state.images.get_mut(image_url) {
            record.pages.insert(page_url.to_string());
            return false;
        }

        state
            .images
            .insert(image_url.to_string(), ImageRecord::new(page_url));

        let probe = self
            .http
            .request(Method::HEAD, image_url, Redirects::Stop, None)
            .await;

        if let Some(response) = &probe {
            if response.is_redirect() {
                let location = response.location.clone().unwrap_or_default();
                println!("[Image Redirect Detected] {} -> {}", image_url, location);

                state.report.push(Finding::ImageRedirect {
                    page: page_url.to_string(),
                    image: image_url.to_string(),
                    location,
                });
                if let Some(record) = state.images.get_mut(image_url) {
                    record.broken = true;
                }
                return true;
            }
        }

        let verdict = self
            .http
            .request(Method::HEAD, image_url, Redirects::Follow, None)
            .await;

        let broken = match &verdict {
            None => true,
            Some(response) => response.status.as_u16() >= 400,
        };

        if let Some(record) = state.images.get_mut(image_url) {
            record.broken = broken;
            if let Some(response) = &verdict {
                record.content_length = response.content_length;
            }
        }

        broken
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HttpConfig;

    #[tokio::test]
    async fn test_memoized_image_not_rechecked() {
        let http = HttpClient::new(&HttpConfig::default()).unwrap();
        let verifier = ImageVerifier::new(&http);
        let mut state = CrawlState::new();

        // Seed the memo as if the image had already been verified broken.
        let mut record = ImageRecord::new("https://x.test/first");
        record.broken = true;
        state
            .images
            .insert("https://x.test/img.png".to_string(), record);

        // No network request happens on a memo hit, so this resolves
        // immediately even for an unreachable test URL.
        let broken = verifier
            .is_broken(&mut state, "https://x.test/img.png", "https://x.test/second")
            .await;

        // First result is authoritative; later sightings report ok.
        assert!(!broken);

        let record = &state.images["https://x.test/img.png"];
        assert!(record.broken);
        assert!(record.pages.contains("https://x.test/first"));
        assert!(record.pages.contains("https://x.test/second"));
        assert!(state.report.is_empty());
    }
}
