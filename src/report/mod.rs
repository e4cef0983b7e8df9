// src/report/mod.rs
// =============================================================================
// This module holds what we report and where it goes.
//
// - Finding / Reason: one defect tied to one file
// - sink: the CSV writer the findings end up in
// =============================================================================

mod sink;

use serde::{Serialize, Serializer};
use std::fmt;

pub use sink::CsvSink;

/// Why a link was reported
///
/// `as_str` is the exact text that appears in the CSV file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Reason {
    NotFound,
    UnclosedTag,
}

impl Reason {
    pub fn as_str(self) -> &'static str {
        match self {
            Reason::NotFound => "Not found",
            Reason::UnclosedTag => "Unclosed tag",
        }
    }
}

impl Serialize for Reason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One reported defect: a link in a file, and what is wrong with it
///
/// Field order is the column order of the report: file, url, reason
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Finding {
    /// Path of the HTML file, as it was reached from the source folder
    pub file: String,
    /// The href exactly as written in the markup
    pub url: String,
    pub reason: Reason,
}

impl Finding {
    pub fn new(file: impl Into<String>, url: impl Into<String>, reason: Reason) -> Self {
        Self {
            file: file.into(),
            url: url.into(),
            reason,
        }
    }
}
