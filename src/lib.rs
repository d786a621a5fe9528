//! Page-Harvest: a paginated record harvester
//!
//! This crate walks a chain of "next page" links starting from one URL,
//! extracts structured records from every page it fetches, and streams them
//! to a sink. The crawl stops at the last page, at the first failed fetch,
//! or as soon as a next link would revisit a page.

pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for Page-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawl, Harvester, HttpFetcher, PageFetcher, Record, Termination};
pub use output::{harvest_into, CsvSink, HarvestSummary, RecordSink};
