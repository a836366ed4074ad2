//! JSON and JSON Lines output of analysis records.
//!
//! JSON Lines records are streamed as they arrive. Plain JSON is buffered
//! until [`RecordWriter::finish`]: a single record is written as an object,
//! several as an array.

use crate::analysis::AnalysisRecord;
use serde::Serialize;
use std::io::{self, Write};

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Writes [`AnalysisRecord`]s in JSON or JSONL format.
pub struct RecordWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    pending: Vec<AnalysisRecord>,
    records_written: usize,
}

impl<W: Write> RecordWriter<W> {
    /// Create a new record writer.
    ///
    /// `pretty` only affects the JSON format; JSONL is always one line per
    /// record.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            pending: Vec::new(),
            records_written: 0,
        }
    }

    /// Add a record. JSONL writes (and flushes) it immediately.
    pub fn push(&mut self, record: AnalysisRecord) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => self.pending.push(record),
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, &record).map_err(io::Error::other)?;
                writeln!(self.writer)?;
                self.writer.flush()?;
                self.records_written += 1;
            }
        }
        Ok(())
    }

    /// Write anything still buffered and flush.
    pub fn finish(&mut self) -> io::Result<()> {
        if self.format == OutputFormat::Json && !self.pending.is_empty() {
            let pending = std::mem::take(&mut self.pending);
            if let [single] = pending.as_slice() {
                self.write_json(single)?;
            } else {
                self.write_json(&pending)?;
            }
            self.records_written += pending.len();
        }
        self.writer.flush()
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, value).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }

    /// Number of records written so far.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}
