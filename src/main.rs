//! Page-Harvest main entry point
//!
//! This is the command-line interface for the Page-Harvest record harvester.

use anyhow::Context;
use clap::Parser;
use page_harvest::config::{load_config_with_hash, validate, Config};
use page_harvest::crawler::Harvester;
use page_harvest::output::{harvest_into, print_summary, CsvSink};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Page-Harvest: a paginated record harvester
///
/// Page-Harvest follows "next page" links from a starting URL, extracts
/// title, price, availability and item URL from every listing page,
/// and writes them to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "page-harvest")]
#[command(version)]
#[command(about = "A paginated record harvester", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// URL of the first listing page
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,

    /// CSV file to write records to
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
    } else {
        handle_harvest(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_harvest=info,warn"),
            1 => EnvFilter::new("page_harvest=debug,info"),
            2 => EnvFilter::new("page_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command-line overrides, validates
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(start_url) = &cli.start_url {
        config.crawler.start_url = start_url.clone();
    }
    if let Some(output) = &cli.output {
        config.output.csv_path = output.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_secs = timeout;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Page-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Request timeout: {}s", config.crawler.timeout_secs);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);

    println!("\nSelectors:");
    println!("  Record: {}", config.selectors.record);
    println!("  Link: {}", config.selectors.link);
    println!("  Price: {}", config.selectors.price);
    println!("  Availability: {}", config.selectors.availability);
    println!("  Next page: {}", config.selectors.next);

    println!("\nOutput:");
    println!("  CSV: {}", config.output.csv_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the main harvest: crawl and stream records into the CSV file
async fn handle_harvest(config: &Config) -> anyhow::Result<()> {
    let start_url = Url::parse(&config.crawler.start_url)?;
    let harvester = Harvester::from_config(config)?;

    let csv_path = Path::new(&config.output.csv_path);
    let mut sink = CsvSink::create(csv_path)
        .with_context(|| format!("Failed to create {}", csv_path.display()))?;

    tracing::info!("Starting harvest at {}", start_url);
    let mut crawl = harvester.crawl(start_url);

    match harvest_into(&mut crawl, &mut sink).await {
        Ok(summary) => {
            print_summary(&summary, &config.output.csv_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
