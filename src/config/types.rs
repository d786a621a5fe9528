use serde::Deserialize;

/// Catalog root crawled when no start URL is configured
pub const DEFAULT_START_URL: &str = "https://books.toscrape.com/";

/// Main configuration structure for Page-Harvest
///
/// Every section is optional in the TOML file; missing sections take the
/// defaults of the reference catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// First page of the paginated listing
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_url: DEFAULT_START_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: env!("CARGO_PKG_NAME").to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the CSV file receiving the records
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: "products.csv".to_string(),
        }
    }
}

/// CSS selectors describing where records live on a page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// One match per record container
    pub record: String,

    /// Item link inside a container; carries the title and the href
    pub link: String,

    /// Price label inside a container
    pub price: String,

    /// Availability label inside a container
    pub availability: String,

    /// The "next page" anchor, searched in the whole document
    pub next: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            record: "article.product_pod".to_string(),
            link: "h3 a".to_string(),
            price: "p.price_color".to_string(),
            availability: "p.instock.availability".to_string(),
            next: "li.next a".to_string(),
        }
    }
}
