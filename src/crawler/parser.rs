//! HTML parser for extracting records and the next-page link
//!
//! This module turns the raw content of one page into:
//! - The records found in each record container, in document order
//! - The absolute URL of the next page, if the page has one
//!
//! Parsing is pure: no I/O, and the same input always yields the same output.

use crate::config::{compile_selector, SelectorConfig};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use url::Url;

/// One extracted item
///
/// Field order is the output column order: title, price, availability, url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub title: String,

    /// Price label as shown on the page, currency symbol included
    pub price: String,

    /// Stock status as shown on the page
    pub availability: String,

    /// Absolute URL of the item page
    pub url: String,
}

impl Record {
    /// Fields in output column order
    pub fn as_row(&self) -> [&str; 4] {
        [&self.title, &self.price, &self.availability, &self.url]
    }
}

/// Everything derived from one page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// Records in document order
    pub records: Vec<Record>,

    /// Absolute URL of the next page; `None` on the last page
    pub next_url: Option<Url>,

    /// Containers dropped because they had no usable item link
    pub skipped: usize,
}

/// Compiled selectors used to pick records out of a page
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    record: Selector,
    link: Selector,
    price: Selector,
    availability: Selector,
    next: Selector,
}

impl ExtractionRules {
    /// Compiles every selector in the configuration
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            record: compile_selector(&config.record)?,
            link: compile_selector(&config.link)?,
            price: compile_selector(&config.price)?,
            availability: compile_selector(&config.availability)?,
            next: compile_selector(&config.next)?,
        })
    }
}

/// Parses one page and extracts its records and next link
///
/// # Arguments
///
/// * `html` - The HTML content of the page
/// * `page_url` - The URL the content was fetched from, used to resolve links
/// * `rules` - Compiled selectors
///
/// # Example
///
/// ```
/// use page_harvest::config::SelectorConfig;
/// use page_harvest::crawler::{parse_page, ExtractionRules};
/// use url::Url;
///
/// let html = r#"<article class="product_pod">
///     <h3><a href="item/index.html" title="A Book">A Bo...</a></h3>
///     <p class="price_color">£10.00</p>
/// </article>
/// <li class="next"><a href="page-2.html">next</a></li>"#;
/// let page_url = Url::parse("https://books.example.com/catalog/page-1.html").unwrap();
/// let rules = ExtractionRules::from_config(&SelectorConfig::default()).unwrap();
/// let parsed = parse_page(html, &page_url, &rules);
///
/// assert_eq!(parsed.records[0].title, "A Book");
/// assert_eq!(
///     parsed.next_url.unwrap().as_str(),
///     "https://books.example.com/catalog/page-2.html"
/// );
/// ```
pub fn parse_page(html: &str, page_url: &Url, rules: &ExtractionRules) -> ParsedPage {
    let document = Html::parse_document(html);

    let mut records = Vec::new();
    let mut skipped = 0;
    for container in document.select(&rules.record) {
        match extract_record(container, page_url, rules) {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    let next_url = extract_next_url(&document, page_url, rules);

    ParsedPage {
        records,
        next_url,
        skipped,
    }
}

/// Extracts a single record; `None` if the container has no usable link
fn extract_record(container: ElementRef<'_>, page_url: &Url, rules: &ExtractionRules) -> Option<Record> {
    let link = container.select(&rules.link).next()?;
    let url = link
        .value()
        .attr("href")
        .and_then(|href| resolve_link(href, page_url))?;

    let title = link
        .value()
        .attr("title")
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| stripped_text(link));

    let price = container
        .select(&rules.price)
        .next()
        .map(stripped_text)
        .unwrap_or_default();

    let availability = container
        .select(&rules.availability)
        .next()
        .map(stripped_text)
        .unwrap_or_default();

    Some(Record {
        title,
        price,
        availability,
        url: url.to_string(),
    })
}

/// Finds the next-page anchor anywhere in the document
fn extract_next_url(document: &Html, page_url: &Url, rules: &ExtractionRules) -> Option<Url> {
    let anchor = document.select(&rules.next).next()?;
    let href = anchor.value().attr("href")?;
    let resolved = resolve_link(href, page_url);
    if resolved.is_none() {
        tracing::warn!("Ignoring unresolvable next link '{}' on {}", href, page_url);
    }
    resolved
}

/// Element text with every fragment trimmed and empty fragments dropped
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Resolves an href against the page URL
///
/// Returns None if the href is empty or cannot be resolved.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    base_url.join(href).ok()
}
