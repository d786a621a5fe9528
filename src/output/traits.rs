//! Sink trait and types
//!
//! This module defines the trait interface for record sinks and the
//! summary produced when a crawl has been drained into one.

use crate::crawler::{Record, Termination};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Consumer of the record sequence
///
/// Records arrive in crawl order. Deduplication, if wanted, is up to the sink.
pub trait RecordSink {
    /// Persists one record
    fn write_record(&mut self, record: &Record) -> OutputResult<()>;

    /// Flushes anything buffered; called once after the last record
    fn finish(&mut self) -> OutputResult<()>;
}

/// Collects records in memory
impl RecordSink for Vec<Record> {
    fn write_record(&mut self, record: &Record) -> OutputResult<()> {
        self.push(record.clone());
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        Ok(())
    }
}

/// Outcome of draining one crawl into a sink
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Pages fetched successfully
    pub pages_fetched: u32,

    /// Records accepted by the sink
    pub records_written: u64,

    /// Why the crawl ended; `None` if it had not terminated yet
    pub termination: Option<Termination>,
}

impl HarvestSummary {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Returns true if every page the crawl reached was fetched
    pub fn is_complete(&self) -> bool {
        matches!(&self.termination, Some(t) if !t.is_failure())
    }
}
