//! CSV sink
//!
//! Writes a header row `title,price,availability,url` followed by one row per
//! record, UTF-8 encoded. The header is written even when no record arrives.

use crate::crawler::Record;
use crate::output::traits::{OutputResult, RecordSink};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Column names, in output order
pub const CSV_HEADER: [&str; 4] = ["title", "price", "availability", "url"];

/// [`RecordSink`] writing delimited rows
pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
}

impl CsvSink<File> {
    /// Creates (or truncates) the file at `path` and writes the header
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        Self::from_writer(file)
    }
}

impl<W: Write> CsvSink<W> {
    /// Wraps any writer and writes the header
    pub fn from_writer(inner: W) -> OutputResult<Self> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(inner);
        writer.write_record(CSV_HEADER)?;
        Ok(Self { writer })
    }

    /// Flushes and returns the underlying writer
    pub fn into_inner(self) -> OutputResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| crate::output::OutputError::Io(e.into_error()))
    }
}

impl<W: Write> RecordSink for CsvSink<W> {
    fn write_record(&mut self, record: &Record) -> OutputResult<()> {
        self.writer.write_record(record.as_row())?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }
}
