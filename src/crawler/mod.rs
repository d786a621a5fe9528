//! Crawler module for page fetching and record extraction
//!
//! This module contains the core harvesting logic, including:
//! - HTTP fetching with a bounded timeout and failure classification
//! - HTML parsing into records and a next-page link
//! - The pagination loop with its self-loop and cycle guards

mod controller;
mod fetcher;
mod parser;

pub use controller::{Crawl, Harvester, Step, Termination};
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpFetcher, PageFetcher};
pub use parser::{parse_page, ExtractionRules, ParsedPage, Record};

use crate::config::Config;
use crate::HarvestError;
use url::Url;

/// Starts a crawl from the configured start URL over HTTP
///
/// # Example
///
/// ```no_run
/// use page_harvest::config::Config;
/// use page_harvest::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut run = crawl(&Config::default())?;
/// while let Some(record) = run.next_record().await {
///     println!("{} {}", record.title, record.price);
/// }
/// # Ok(())
/// # }
/// ```
pub fn crawl(config: &Config) -> Result<Crawl<HttpFetcher>, HarvestError> {
    let start_url = Url::parse(&config.crawler.start_url)?;
    let harvester = Harvester::from_config(config)?;
    Ok(harvester.crawl(start_url))
}
