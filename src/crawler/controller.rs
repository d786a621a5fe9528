//! Crawl controller - pagination loop and termination rules
//!
//! The controller owns one crawl run. It fetches a page, parses it, hands the
//! page's records out one at a time, and only then decides whether there is a
//! page to fetch next. Records are pulled: nothing is fetched until the
//! consumer asks for a record that is not already buffered.
//!
//! A run ends (and stays ended) when:
//! - The page has no next link
//! - The next link points at the page itself
//! - The next link points at a page already fetched in this run
//! - A fetch fails

use crate::config::Config;
use crate::crawler::fetcher::{FetchResult, HttpFetcher, PageFetcher};
use crate::crawler::parser::{parse_page, ExtractionRules, Record};
use crate::HarvestError;
use futures::Stream;
use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Why a crawl stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// The last fetched page had no next link
    LastPage,

    /// The next link resolved to the page it was found on
    SelfLoop,

    /// The next link resolved to a page already fetched in this run
    Cycle { url: Url },

    /// A page could not be fetched; it contributed no records
    FetchFailed { url: Url, reason: String },
}

impl Termination {
    /// Returns true if the crawl ended because of a failed fetch
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LastPage => write!(f, "reached last page"),
            Self::SelfLoop => write!(f, "next link points to the current page"),
            Self::Cycle { url } => write!(f, "next link revisits {}", url),
            Self::FetchFailed { url, reason } => write!(f, "fetch failed for {}: {}", url, reason),
        }
    }
}

/// Position of a crawl run; lives and dies with one [`Crawl`]
#[derive(Debug, Clone)]
struct CrawlCursor {
    /// The page being (or about to be) fetched
    current_url: Url,

    /// 1-based, diagnostics only
    page_number: u32,

    /// Pages already left behind in this run
    visited: HashSet<Url>,
}

impl CrawlCursor {
    fn new(start_url: Url) -> Self {
        Self {
            current_url: start_url,
            page_number: 1,
            visited: HashSet::new(),
        }
    }

    /// Applies the self-loop and cycle guards to a candidate next page
    fn check_next(&self, next_url: &Url) -> Option<Termination> {
        if *next_url == self.current_url {
            Some(Termination::SelfLoop)
        } else if self.visited.contains(next_url) {
            Some(Termination::Cycle {
                url: next_url.clone(),
            })
        } else {
            None
        }
    }

    fn advance(&mut self, next_url: Url) {
        let previous = std::mem::replace(&mut self.current_url, next_url);
        self.visited.insert(previous);
        self.page_number += 1;
    }
}

/// Outcome of one [`Crawl::step`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A record from the current page
    Record(Record),

    /// A page was fetched but had no records; the run continues
    EmptyPage,

    /// The run has terminated
    Finished,
}

/// What happens once the current page's records are drained
#[derive(Debug)]
enum AfterPage {
    Advance(Url),
    Stop(Termination),
}

#[derive(Debug)]
enum CrawlState {
    /// `cursor.current_url` is fetched on the next pull
    Fetching,

    /// Buffered records are being handed out
    Emitting { then: AfterPage },

    /// Absorbing: no further fetches
    Terminated(Termination),
}

/// Configured controller: one fetcher and one set of extraction rules
///
/// Every call to [`Harvester::crawl`] starts an independent run with a fresh
/// cursor; nothing is cached between runs.
#[derive(Debug)]
pub struct Harvester<F> {
    fetcher: Arc<F>,
    rules: Arc<ExtractionRules>,
}

impl<F> Clone for Harvester<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            rules: Arc::clone(&self.rules),
        }
    }
}

impl<F: PageFetcher> Harvester<F> {
    pub fn new(fetcher: F, rules: ExtractionRules) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            rules: Arc::new(rules),
        }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Starts a new crawl run at `start_url`
    ///
    /// Nothing is fetched until the first record is requested.
    pub fn crawl(&self, start_url: Url) -> Crawl<F> {
        Crawl {
            fetcher: Arc::clone(&self.fetcher),
            rules: Arc::clone(&self.rules),
            cursor: CrawlCursor::new(start_url),
            state: CrawlState::Fetching,
            pending: VecDeque::new(),
            pages_fetched: 0,
            records_emitted: 0,
        }
    }
}

impl Harvester<HttpFetcher> {
    /// Builds an HTTP-backed harvester from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let rules = ExtractionRules::from_config(&config.selectors)?;
        let fetcher = HttpFetcher::from_config(
            &config.user_agent,
            Duration::from_secs(config.crawler.timeout_secs),
        )?;
        Ok(Self::new(fetcher, rules))
    }
}

/// One crawl run, consumed by pulling records
pub struct Crawl<F> {
    fetcher: Arc<F>,
    rules: Arc<ExtractionRules>,
    cursor: CrawlCursor,
    state: CrawlState,
    pending: VecDeque<Record>,
    pages_fetched: u32,
    records_emitted: u64,
}

impl<F: PageFetcher> Crawl<F> {
    /// Returns the next record
    ///
    /// Pages are fetched until one yields a record or the crawl terminates, so
    /// a run of empty pages costs several fetches in one call. No page after
    /// the returned record's page is fetched. Use [`Crawl::step`] to bound a
    /// call to a single fetch.
    ///
    /// `None` means the crawl has terminated; see [`Crawl::termination`].
    pub async fn next_record(&mut self) -> Option<Record> {
        loop {
            match self.step().await {
                Step::Record(record) => return Some(record),
                Step::EmptyPage => continue,
                Step::Finished => return None,
            }
        }
    }

    /// Advances the run by at most one fetch
    pub async fn step(&mut self) -> Step {
        let mut fetched = false;
        loop {
            match self.state {
                CrawlState::Terminated(_) => return Step::Finished,
                CrawlState::Fetching if fetched => return Step::EmptyPage,
                CrawlState::Fetching => {
                    self.fetch_current_page().await;
                    fetched = true;
                }
                CrawlState::Emitting { .. } => match self.pending.pop_front() {
                    Some(record) => {
                        self.records_emitted += 1;
                        return Step::Record(record);
                    }
                    None => self.finish_page(),
                },
            }
        }
    }

    /// Adapts the run into a stream of records
    pub fn into_stream(self) -> impl Stream<Item = Record> {
        futures::stream::unfold(self, |mut crawl| async move {
            let record = crawl.next_record().await?;
            Some((record, crawl))
        })
    }

    /// Why the run stopped; `None` while it is still running
    pub fn termination(&self) -> Option<&Termination> {
        match &self.state {
            CrawlState::Terminated(termination) => Some(termination),
            _ => None,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.state, CrawlState::Terminated(_))
    }

    /// Number of successful page fetches so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Number of records handed to the consumer so far
    pub fn records_emitted(&self) -> u64 {
        self.records_emitted
    }

    /// Page currently being fetched or emitted
    pub fn current_url(&self) -> &Url {
        &self.cursor.current_url
    }

    pub fn page_number(&self) -> u32 {
        self.cursor.page_number
    }

    /// Fetching → Emitting on success, Fetching → Terminated on failure
    async fn fetch_current_page(&mut self) {
        let url = self.cursor.current_url.clone();
        let page_number = self.cursor.page_number;
        tracing::info!("Fetching page {}: {}", page_number, url);

        let body = match self.fetcher.fetch(&url).await {
            FetchResult::Success { body, .. } => body,
            failed => {
                let reason = failed.failure_reason().unwrap_or_default();
                self.terminate(Termination::FetchFailed { url, reason });
                return;
            }
        };
        self.pages_fetched += 1;

        let parsed = parse_page(&body, &url, &self.rules);
        tracing::info!("Page {}: {} records", page_number, parsed.records.len());
        if parsed.skipped > 0 {
            tracing::debug!(
                "Page {}: skipped {} containers without an item link",
                page_number,
                parsed.skipped
            );
        }

        let then = match parsed.next_url {
            None => AfterPage::Stop(Termination::LastPage),
            Some(next_url) => match self.cursor.check_next(&next_url) {
                Some(termination) => AfterPage::Stop(termination),
                None => AfterPage::Advance(next_url),
            },
        };

        self.pending.extend(parsed.records);
        self.state = CrawlState::Emitting { then };
    }

    /// Emitting → Fetching or Terminated once the buffer is drained
    fn finish_page(&mut self) {
        let state = std::mem::replace(&mut self.state, CrawlState::Fetching);
        match state {
            CrawlState::Emitting {
                then: AfterPage::Advance(next_url),
            } => {
                tracing::debug!("Advancing to {}", next_url);
                self.cursor.advance(next_url);
            }
            CrawlState::Emitting {
                then: AfterPage::Stop(termination),
            } => self.terminate(termination),
            other => self.state = other,
        }
    }

    fn terminate(&mut self, termination: Termination) {
        if termination.is_failure() {
            tracing::warn!("Crawl stopped: {}", termination);
        } else {
            tracing::info!("Crawl finished: {}", termination);
        }
        self.pending.clear();
        self.state = CrawlState::Terminated(termination);
    }
}
