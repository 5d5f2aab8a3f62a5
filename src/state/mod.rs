//! Crawl state for pixelsweep
//!
//! All mutable crawl-wide state lives in [`CrawlState`], owned by the
//! crawl engine for the duration of one run and read out afterwards to
//! produce the report. Nothing here persists across runs.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A single report finding, in discovery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Finding {
    /// An image URL whose verification failed or returned an error
    /// status
    BrokenImage { page: String, image: String },

    /// An image URL that answered a no-follow HEAD with a 3xx and a
    /// Location target; flagged for manual review
    ImageRedirect {
        page: String,
        image: String,
        location: String,
    },

    /// A page URL that answered a no-follow GET with a 3xx; the page
    /// is not traversed
    PageRedirect { page: String, location: String },

    /// A page URL skipped before fetching (non-page file extension)
    SkippedPage { page: String, reason: String },
}

/// Verification record for one distinct image URL
///
/// The record owns the set of referencing pages; pages are tracked by
/// URL string only. The first verification fixes `broken` for the
/// whole run, later sightings only extend `pages`.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    /// Pages that reference this image
    pub pages: HashSet<String>,

    /// Authoritative verification result
    pub broken: bool,

    /// Content-Length captured during verification, used for the final
    /// size summary without re-fetching
    pub content_length: Option<u64>,
}

impl ImageRecord {
    /// Creates a record for a freshly sighted image
    pub fn new(page: &str) -> Self {
        let mut pages = HashSet::new();
        pages.insert(page.to_string());
        Self {
            pages,
            broken: false,
            content_length: None,
        }
    }
}

/// Process-wide crawl state
#[derive(Debug, Default)]
pub struct CrawlState {
    /// Page URLs already dequeued for crawling; each enters at most
    /// once
    pub visited: HashSet<String>,

    /// Stylesheet URLs already fetched and scanned
    pub css_checked: HashSet<String>,

    /// Image URL -> verification record
    pub images: HashMap<String, ImageRecord>,

    /// Append-only findings, in discovery order
    pub report: Vec<Finding>,
}

impl CrawlState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a page URL as visited; returns false if it already was
    ///
    /// Membership test and insertion are one operation so a URL can
    /// never be processed twice.
    pub fn mark_visited(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    /// Number of pages dequeued so far
    pub fn pages_visited(&self) -> usize {
        self.visited.len()
    }

    /// Number of distinct image URLs sighted
    pub fn images_checked(&self) -> usize {
        self.images.len()
    }

    /// Sum of the Content-Length values captured during verification
    pub fn total_image_bytes(&self) -> u64 {
        self.images
            .values()
            .filter_map(|record| record.content_length)
            .sum()
    }

    /// Number of broken-image findings (excludes page-level entries)
    pub fn broken_image_count(&self) -> usize {
        self.report
            .iter()
            .filter(|f| matches!(f, Finding::BrokenImage { .. }))
            .count()
    }
}

/// Cooperative cancellation token
///
/// Cloned into the signal handler; the crawl engine polls it at the
/// top of every page visit and before each descent. An in-flight
/// request is not aborted, but no new fetch starts once set.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_visited_once() {
        let mut state = CrawlState::new();
        assert!(state.mark_visited("https://x.test/"));
        assert!(!state.mark_visited("https://x.test/"));
        assert_eq!(state.pages_visited(), 1);
    }

    #[test]
    fn test_image_record_starts_with_referencing_page() {
        let record = ImageRecord::new("https://x.test/page");
        assert!(record.pages.contains("https://x.test/page"));
        assert!(!record.broken);
        assert_eq!(record.content_length, None);
    }

    #[test]
    fn test_total_image_bytes_skips_unknown_sizes() {
        let mut state = CrawlState::new();

        let mut a = ImageRecord::new("https://x.test/");
        a.content_length = Some(1000);
        state.images.insert("https://x.test/a.png".to_string(), a);

        let b = ImageRecord::new("https://x.test/");
        state.images.insert("https://x.test/b.png".to_string(), b);

        assert_eq!(state.total_image_bytes(), 1000);
    }

    #[test]
    fn test_broken_image_count_ignores_page_findings() {
        let mut state = CrawlState::new();
        state.report.push(Finding::BrokenImage {
            page: "https://x.test/".to_string(),
            image: "https://x.test/a.png".to_string(),
        });
        state.report.push(Finding::PageRedirect {
            page: "https://x.test/old".to_string(),
            location: "https://x.test/new".to_string(),
        });
        state.report.push(Finding::SkippedPage {
            page: "https://x.test/file.pdf".to_string(),
            reason: "non-page extension".to_string(),
        });

        assert_eq!(state.broken_image_count(), 1);
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!token.is_cancelled());

        clone.cancel();
        assert!(token.is_cancelled());
    }
}
