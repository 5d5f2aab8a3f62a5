//! Crawl engine module
//!
//! Contains the traversal logic that ties fetching, extraction, and
//! verification together.

mod engine;

pub use engine::Crawler;

use crate::config::Config;
use crate::state::{CancelToken, CrawlState};
use crate::Result;
use url::Url;

/// Runs a complete crawl and returns the final state
///
/// Convenience wrapper around [`Crawler`]: builds the engine scoped to
/// the start URL's host, runs it to completion or cancellation, and
/// hands back the accumulated state for reporting.
pub async fn run_crawl(
    config: Config,
    start_url: &Url,
    cancel: CancelToken,
) -> Result<CrawlState> {
    let mut crawler = Crawler::new(config, start_url, cancel)?;
    crawler.run(start_url).await;
    Ok(crawler.state)
}
