//! Harvest summary display

use crate::output::traits::HarvestSummary;

/// Prints a harvest summary to stdout
pub fn print_summary(summary: &HarvestSummary, destination: &str) {
    println!("=== Harvest Summary ===\n");

    println!("Started:  {}", summary.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Finished: {}", summary.finished_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!("Duration: {}s", summary.duration_seconds());
    println!();

    println!("Pages fetched:   {}", summary.pages_fetched);
    println!("Records written: {}", summary.records_written);
    println!("Output:          {}", destination);
    println!();

    match &summary.termination {
        Some(termination) => println!("Stopped because: {}", termination),
        None => println!("Stopped because: crawl still running"),
    }

    if !summary.is_complete() {
        println!("Warning: the listing may have more pages than were harvested");
    }
}
