// src/report/sink.rs
// =============================================================================
// Writes findings to a CSV file.
//
// Format:
//   "file","url","reason"
//   "site/a/1.html","missing.html","Not found"
//
// Every field is quoted. The header is written as soon as the sink is
// created, so even a clean run leaves a valid (header-only) report behind,
// and a bad output path fails before we start scanning.
//
// The `csv` crate only formats: each row is encoded into a small in-memory
// buffer, then written to the file with tokio's async I/O. Writing a row is
// therefore an .await point and never blocks a runtime thread.
// =============================================================================

use anyhow::{anyhow, Context, Result};
use csv::{QuoteStyle, WriterBuilder};
use serde::Serialize;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use super::{Finding, Reason};

// Column names, in the order the Finding fields serialize
pub const HEADER: [&str; 3] = ["file", "url", "reason"];

// Placeholder for a column that has no value
pub const NULL_FIELD: &str = "NULL";

// One CSV row, borrowing from a Finding
#[derive(Serialize)]
struct Row<'a> {
    file: &'a str,
    url: &'a str,
    reason: Reason,
}

/// CSV destination for findings
pub struct CsvSink<W = File> {
    out: W,
}

impl CsvSink<File> {
    /// Creates (or truncates) the report file and writes the header row
    pub async fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .await
            .with_context(|| format!("cannot create output file '{}'", path.display()))?;
        Self::from_writer(file).await
    }
}

impl<W: AsyncWrite + Unpin> CsvSink<W> {
    /// Wraps any async writer and writes the header row
    pub async fn from_writer(out: W) -> Result<Self> {
        let mut sink = Self { out };
        let header = encode(HEADER)?;
        sink.write_bytes(&header)
            .await
            .context("failed to write report header")?;
        Ok(sink)
    }

    /// Appends one row and flushes it to the underlying writer
    pub async fn write(&mut self, finding: &Finding) -> Result<()> {
        let row = encode(Row {
            file: non_empty_or_null(&finding.file),
            url: non_empty_or_null(&finding.url),
            reason: finding.reason,
        })?;
        self.write_bytes(&row)
            .await
            .with_context(|| format!("failed to write finding for '{}'", finding.file))
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes).await?;
        self.out.flush().await?;
        Ok(())
    }
}

// Encodes one record as a fully quoted CSV line
fn encode<R: Serialize>(record: R) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .has_headers(false)
        .from_writer(Vec::new());

    writer.serialize(record).context("failed to encode CSV row")?;
    writer
        .into_inner()
        .map_err(|e| anyhow!("failed to encode CSV row: {}", e.error()))
}

// A column with no value is written as the literal NULL
fn non_empty_or_null(value: &str) -> &str {
    if value.is_empty() {
        NULL_FIELD
    } else {
        value
    }
}
