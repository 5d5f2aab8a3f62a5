//! Asset extraction from HTML pages
//!
//! Parsing happens in two phases. [`parse_page`] walks the DOM once
//! and returns plain owned URL lists, so the non-`Send` scraper
//! document never lives across an await point. [`extract_assets`] then
//! resolves linked stylesheets over the network and unions every image
//! source into one deduplicated set.

mod css;

pub use css::extract_css_urls;

use crate::http::{HttpClient, Redirects};
use crate::state::CrawlState;
use reqwest::{Method, StatusCode};
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Raw references pulled from a parsed page, before any network work
#[derive(Debug, Default)]
pub struct PageRefs {
    /// Absolute image URLs from `src` and `srcset` attributes
    pub image_urls: Vec<Url>,

    /// Text of inline `<style>` blocks
    pub inline_css: Vec<String>,

    /// Absolute URLs of linked stylesheets
    pub stylesheets: Vec<Url>,

    /// Absolute anchor targets, duplicates permitted
    pub links: Vec<Url>,
}

/// Final extraction result for one page
#[derive(Debug, Default)]
pub struct PageAssets {
    /// Deduplicated absolute image URLs
    pub images: HashSet<String>,

    /// Outbound page links in document order; deduplication is the
    /// crawl engine's job via its visited set
    pub links: Vec<String>,
}

/// Walks the DOM and collects image, stylesheet, and anchor references
///
/// All URLs are resolved against `base_url`; references that fail to
/// resolve are dropped silently.
pub fn parse_page(html: &str, base_url: &Url) -> PageRefs {
    let document = Html::parse_document(html);
    let mut refs = PageRefs::default();

    let img_selector = Selector::parse("img[src]").expect("valid selector");
    for element in document.select(&img_selector) {
        if let Some(src) = element.value().attr("src") {
            if let Ok(resolved) = base_url.join(src) {
                refs.image_urls.push(resolved);
            }
        }
    }

    // srcset appears on both <img> and <source> (inside <picture>)
    let srcset_selector = Selector::parse("img[srcset], source[srcset]").expect("valid selector");
    for element in document.select(&srcset_selector) {
        if let Some(srcset) = element.value().attr("srcset") {
            for candidate in srcset_candidates(srcset) {
                if let Ok(resolved) = base_url.join(candidate) {
                    refs.image_urls.push(resolved);
                }
            }
        }
    }

    let style_selector = Selector::parse("style").expect("valid selector");
    for element in document.select(&style_selector) {
        refs.inline_css.push(element.text().collect::<String>());
    }

    let stylesheet_selector =
        Selector::parse(r#"link[rel~="stylesheet"][href]"#).expect("valid selector");
    for element in document.select(&stylesheet_selector) {
        if let Some(href) = element.value().attr("href") {
            if let Ok(resolved) = base_url.join(href) {
                refs.stylesheets.push(resolved);
            }
        }
    }

    let anchor_selector = Selector::parse("a[href]").expect("valid selector");
    for element in document.select(&anchor_selector) {
        if let Some(href) = element.value().attr("href") {
            if let Ok(resolved) = base_url.join(href) {
                refs.links.push(resolved);
            }
        }
    }

    refs
}

/// Splits a srcset attribute into its candidate URLs
///
/// Candidates are comma-separated; each one is a URL optionally
/// followed by a width or density descriptor after whitespace.
fn srcset_candidates(srcset: &str) -> Vec<&str> {
    srcset
        .split(',')
        .filter_map(|candidate| candidate.split_whitespace().next())
        .collect()
}

/// Produces the full asset set for a page
///
/// Inline style blocks go straight through the CSS extractor; linked
/// stylesheets are fetched at most once per run (tracked in
/// `state.css_checked`) and scanned on a 200 response. A stylesheet
/// that cannot be fetched simply contributes no URLs.
pub async fn extract_assets(
    html: &str,
    base_url: &Url,
    http: &HttpClient,
    state: &mut CrawlState,
) -> PageAssets {
    let refs = parse_page(html, base_url);

    let mut images: HashSet<String> =
        refs.image_urls.iter().map(|u| u.to_string()).collect();

    for block in &refs.inline_css {
        for url in extract_css_urls(block, base_url) {
            images.insert(url.to_string());
        }
    }

    for sheet in &refs.stylesheets {
        let sheet_url = sheet.to_string();
        if !state.css_checked.insert(sheet_url.clone()) {
            continue;
        }

        tracing::debug!("Fetching stylesheet: {}", sheet_url);
        match http
            .request(Method::GET, &sheet_url, Redirects::Follow, None)
            .await
        {
            Some(response) if response.status == StatusCode::OK => {
                for url in extract_css_urls(&response.body, sheet) {
                    images.insert(url.to_string());
                }
            }
            _ => {
                tracing::debug!("Stylesheet unavailable, skipping: {}", sheet_url);
            }
        }
    }

    PageAssets {
        images,
        links: refs.links.iter().map(|u| u.to_string()).collect(),
    }
}
