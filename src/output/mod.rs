//! Output module for persisting harvested records
//!
//! This module handles:
//! - The sink interface records are streamed into
//! - CSV output in the `title,price,availability,url` layout
//! - Draining a crawl into a sink and summarizing the run

mod csv_sink;
pub mod stats;
mod traits;

pub use csv_sink::{CsvSink, CSV_HEADER};
pub use stats::print_summary;
pub use traits::{HarvestSummary, OutputError, OutputResult, RecordSink};

use crate::crawler::{Crawl, PageFetcher};
use chrono::Utc;

/// Drains a crawl into a sink, one record at a time
///
/// Each record is written before the next one is pulled, so the crawl never
/// fetches ahead of the sink. A sink error stops the crawl immediately; the
/// records already written stay written.
///
/// # Returns
///
/// * `Ok(HarvestSummary)` - The crawl ended (normally or at a failed fetch)
/// * `Err(OutputError)` - The sink rejected a record or failed to flush
pub async fn harvest_into<F, S>(crawl: &mut Crawl<F>, sink: &mut S) -> OutputResult<HarvestSummary>
where
    F: PageFetcher,
    S: RecordSink + ?Sized,
{
    let started_at = Utc::now();
    let mut records_written = 0u64;

    while let Some(record) = crawl.next_record().await {
        sink.write_record(&record)?;
        records_written += 1;
    }
    sink.finish()?;

    let summary = HarvestSummary {
        started_at,
        finished_at: Utc::now(),
        pages_fetched: crawl.pages_fetched(),
        records_written,
        termination: crawl.termination().cloned(),
    };

    tracing::info!(
        "Harvest complete: {} records from {} pages",
        summary.records_written,
        summary.pages_fetched
    );

    Ok(summary)
}
