//! HTTP client adapter
//!
//! This module wraps reqwest with the crawl-friendly request policy:
//! - a fixed per-request timeout
//! - indefinite retry with doubling backoff on HTTP 429
//! - optional domain constraint that skips redirects leaving the crawl
//!   domain
//! - conversion of every transport failure into a "no result" outcome
//!
//! Callers never see a transport error: a request either yields a
//! [`Fetched`] response or `None`, and `None` means "could not fetch /
//! could not verify" for whatever purpose the caller has.

use crate::config::HttpConfig;
use crate::url::extract_domain;
use reqwest::header::{CONTENT_LENGTH, LOCATION};
use reqwest::{redirect::Policy, Client, Method, StatusCode};
use std::time::Duration;
use url::Url;

/// Redirect handling mode for a single request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirects {
    /// Follow redirects (bounded by reqwest's hop limit)
    Follow,
    /// Return the 3xx response as-is
    Stop,
}

/// A completed HTTP response, reduced to what the crawler needs
#[derive(Debug)]
pub struct Fetched {
    /// Final HTTP status code
    pub status: StatusCode,

    /// URL the response came from (after any followed redirects)
    pub final_url: String,

    /// Location header value, present on unfollowed redirects
    pub location: Option<String>,

    /// Content-Length header value, if the server sent one
    pub content_length: Option<u64>,

    /// Response body; empty for HEAD requests
    pub body: String,
}

impl Fetched {
    /// Returns true if this response is an unfollowed redirect with a
    /// Location target
    pub fn is_redirect(&self) -> bool {
        self.status.is_redirection() && self.location.is_some()
    }
}

/// HTTP client adapter holding one client per redirect policy
pub struct HttpClient {
    following: Client,
    direct: Client,
    backoff_start: Duration,
    backoff_cap: Duration,
}

impl HttpClient {
    /// Builds the adapter from the HTTP configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let build = |policy: Policy| {
            Client::builder()
                .user_agent(&config.user_agent)
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .redirect(policy)
                .gzip(true)
                .brotli(true)
                .build()
        };

        Ok(Self {
            following: build(Policy::limited(10))?,
            direct: build(Policy::none())?,
            backoff_start: Duration::from_secs(config.backoff_start_secs),
            backoff_cap: Duration::from_secs(config.backoff_cap_secs),
        })
    }

    /// Issues a request and reduces the outcome to `Option<Fetched>`
    ///
    /// Retries indefinitely on HTTP 429, sleeping `backoff_start` and
    /// doubling up to `backoff_cap` between attempts. This is the only
    /// retry; every other failure is final for this call.
    ///
    /// When `domain` is given and the response is an unfollowed 3xx
    /// whose Location host does not contain `domain` as a substring,
    /// the redirect is treated as leaving the site and the call
    /// returns `None` (skip, not error).
    ///
    /// Transport failures (timeout, connection refused, DNS) are
    /// logged and collapse to `None`.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        redirects: Redirects,
        domain: Option<&str>,
    ) -> Option<Fetched> {
        let client = match redirects {
            Redirects::Follow => &self.following,
            Redirects::Stop => &self.direct,
        };

        let mut wait = self.backoff_start;

        loop {
            let response = match client.request(method.clone(), url).send().await {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("Request failed for {}: {}", url, e);
                    return None;
                }
            };

            if response.status() == StatusCode::TOO_MANY_REQUESTS {
                println!(
                    "[429 Too Many Requests] Waiting {}s before retrying: {}",
                    wait.as_secs(),
                    url
                );
                tokio::time::sleep(wait).await;
                wait = (wait * 2).min(self.backoff_cap);
                continue;
            }

            let status = response.status();
            let final_url = response.url().to_string();
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(String::from);
            let content_length = response
                .headers()
                .get(CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());

            if let Some(domain) = domain {
                if status.is_redirection() {
                    if let Some(loc) = &location {
                        if let Some(host) = redirect_host(&final_url, loc) {
                            if !host.contains(domain) {
                                tracing::info!(
                                    "Redirect leaves crawl domain, skipping: {} -> {}",
                                    url,
                                    loc
                                );
                                return None;
                            }
                        }
                    }
                }
            }

            let body = if method == Method::GET {
                match response.text().await {
                    Ok(b) => b,
                    Err(e) => {
                        tracing::warn!("Failed to read body from {}: {}", url, e);
                        return None;
                    }
                }
            } else {
                String::new()
            };

            return Some(Fetched {
                status,
                final_url,
                location,
                content_length,
                body,
            });
        }
    }
}

/// Resolves a Location header value against the request URL and
/// returns the target host
fn redirect_host(request_url: &str, location: &str) -> Option<String> {
    let base = Url::parse(request_url).ok()?;
    let target = base.join(location).ok()?;
    extract_domain(&target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redirect_host_absolute_location() {
        let host = redirect_host("https://x.test/page", "https://other.test/landing");
        assert_eq!(host, Some("other.test".to_string()));
    }

    #[test]
    fn test_redirect_host_relative_location() {
        let host = redirect_host("https://x.test/page", "/moved");
        assert_eq!(host, Some("x.test".to_string()));
    }

    #[test]
    fn test_redirect_host_malformed_location() {
        assert_eq!(redirect_host("https://x.test/page", "https://"), None);
    }

    #[test]
    fn test_fetched_is_redirect() {
        let fetched = Fetched {
            status: StatusCode::MOVED_PERMANENTLY,
            final_url: "https://x.test/old".to_string(),
            location: Some("https://x.test/new".to_string()),
            content_length: None,
            body: String::new(),
        };
        assert!(fetched.is_redirect());
    }

    #[test]
    fn test_fetched_redirect_without_location() {
        let fetched = Fetched {
            status: StatusCode::FOUND,
            final_url: "https://x.test/old".to_string(),
            location: None,
            content_length: None,
            body: String::new(),
        };
        assert!(!fetched.is_redirect());
    }

    #[test]
    fn test_client_builds_from_defaults() {
        let config = HttpConfig::default();
        assert!(HttpClient::new(&config).is_ok());
    }
}
