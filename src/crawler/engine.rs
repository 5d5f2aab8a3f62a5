//! Crawl engine - traversal orchestration
//!
//! Walks every page of the target domain exactly once, running asset
//! extraction and image verification per page and accumulating the
//! broken-image report in [`CrawlState`].
//!
//! Traversal is depth-first over an explicit LIFO work list instead of
//! call-stack recursion, so arbitrarily deep sites cannot overflow the
//! stack. A page's links are pushed in reverse document order, which
//! reproduces the visit order of a synchronous recursive descent.

use crate::config::Config;
use crate::extract::extract_assets;
use crate::http::{HttpClient, Redirects};
use crate::state::{CancelToken, CrawlState, Finding};
use crate::url::{extract_domain, has_skip_extension, in_crawl_scope, is_supported_scheme};
use crate::verify::ImageVerifier;
use crate::{Result, SweepError};
use reqwest::{Method, StatusCode};
use url::Url;

/// Crawl engine owning the per-run state
pub struct Crawler {
    config: Config,
    http: HttpClient,
    domain: String,
    cancel: CancelToken,
    pub state: CrawlState,
}

impl Crawler {
    /// Creates an engine scoped to the start URL's host
    ///
    /// # Arguments
    ///
    /// * `config` - Crawler configuration
    /// * `start_url` - The URL the crawl will begin from; its host
    ///   becomes the domain constraint for the whole run
    /// * `cancel` - Cooperative cancellation token
    pub fn new(config: Config, start_url: &Url, cancel: CancelToken) -> Result<Self> {
        let domain = extract_domain(start_url)
            .ok_or_else(|| SweepError::InvalidStartUrl(format!("URL has no host: {start_url}")))?;
        let http = HttpClient::new(&config.http)?;

        Ok(Self {
            config,
            http,
            domain,
            cancel,
            state: CrawlState::new(),
        })
    }

    /// The domain this crawl is scoped to
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Runs the crawl to completion or cancellation
    ///
    /// Per URL: scheme check, atomic visited check, then
    /// [`Self::visit_page`]. In-scope links re-enter the work list.
    /// Cancellation is polled before every visit and before each
    /// descent; on cancellation the loop unwinds and the partial
    /// report in `self.state` remains valid.
    pub async fn run(&mut self, start_url: &Url) {
        let mut work = vec![start_url.clone()];

        while let Some(url) = work.pop() {
            if self.cancel.is_cancelled() {
                println!("\n[Stopping] Crawl interrupted, finishing with partial results.");
                break;
            }

            if !is_supported_scheme(&url) {
                tracing::debug!("Skipping unsupported scheme: {}", url);
                continue;
            }

            if !self.state.mark_visited(url.as_str()) {
                continue;
            }

            let links = self.visit_page(&url).await;

            // Reverse push keeps depth-first descent in document order.
            for link in links.into_iter().rev() {
                if self.cancel.is_cancelled() {
                    break;
                }
                work.push(link);
            }
        }

        tracing::info!(
            "Crawl finished: {} pages visited, {} images checked, {} findings",
            self.state.pages_visited(),
            self.state.images_checked(),
            self.state.report.len()
        );
    }

    /// Visits one page and returns its in-scope outbound links
    ///
    /// The page contributes nothing and is not traversed further when
    /// it has a non-page extension, answers the no-follow probe with a
    /// redirect, or cannot be fetched with a 200.
    async fn visit_page(&mut self, url: &Url) -> Vec<Url> {
        let page = url.as_str().to_string();
        println!("\n[Crawling {}] {}", self.state.pages_visited(), page);

        if has_skip_extension(url, &self.config.skip_extensions) {
            println!("[Skip Non-HTML] {}", page);
            self.state.report.push(Finding::SkippedPage {
                page,
                reason: "non-page extension".to_string(),
            });
            return Vec::new();
        }

        // Redirect probe before the real fetch; redirected pages are
        // reported and never traversed. No result here means the page
        // could not be fetched or redirects out of the crawl domain.
        let probe = match self
            .http
            .request(Method::GET, &page, Redirects::Stop, Some(&self.domain))
            .await
        {
            Some(response) => response,
            None => {
                tracing::warn!("Failed to load page: {}", page);
                return Vec::new();
            }
        };
        if probe.is_redirect() {
            let location = probe.location.clone().unwrap_or_default();
            println!("[Redirect Detected] {} -> {}", page, location);
            self.state.report.push(Finding::PageRedirect { page, location });
            return Vec::new();
        }

        let fetched = self
            .http
            .request(Method::GET, &page, Redirects::Follow, Some(&self.domain))
            .await;
        let body = match fetched {
            Some(response) if response.status == StatusCode::OK => response.body,
            Some(response) => {
                tracing::warn!("[{}] Failed to load page: {}", response.status, page);
                return Vec::new();
            }
            None => {
                tracing::warn!("Failed to load page: {}", page);
                return Vec::new();
            }
        };

        let assets = extract_assets(&body, url, &self.http, &mut self.state).await;
        if !assets.images.is_empty() {
            println!("[Images found] {}", assets.images.len());
        }

        // Sorted order keeps console output and report order stable.
        let mut image_urls: Vec<&String> = assets.images.iter().collect();
        image_urls.sort();

        let verifier = ImageVerifier::new(&self.http);
        let mut broken_on_page = 0;

        for image in image_urls {
            if verifier.is_broken(&mut self.state, image, &page).await {
                println!("[broken] {}", image);
                self.state.report.push(Finding::BrokenImage {
                    page: page.clone(),
                    image: image.clone(),
                });
                broken_on_page += 1;
            } else {
                println!("[ok] {}", image);
            }
        }

        if broken_on_page > 0 {
            println!("[Broken on page] {}", broken_on_page);
        }

        assets
            .links
            .iter()
            .filter_map(|link| Url::parse(link).ok())
            .filter(|link| in_crawl_scope(link, &self.domain))
            .collect()
    }
}
