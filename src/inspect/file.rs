// src/inspect/file.rs
// =============================================================================
// Inspects a single file.
//
// How it works:
// 1. Skip anything whose name does not end in ".html" (never opened)
// 2. Read the whole file as UTF-8 text
// 3. Run the not-found check against the file's folder
// 4. Run the unclosed-tag check on the raw text
// 5. Hand every finding to the session, which drops repeats
//
// A file we cannot read is logged and skipped; the rest of the run goes on.
// Failing to write to the report is NOT skipped: that error is returned.
// =============================================================================

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWrite;
use tracing::{debug, warn};

use super::InspectionSession;
use crate::checker::{classify, find_not_found_links, find_unclosed_links};
use crate::report::{Finding, Reason};

/// What happened to one discovered file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// Not an .html file
    Skipped,
    /// An .html file that could not be read as text
    Unreadable,
    /// Inspected; `written` rows were added to the report
    Inspected { written: usize },
}

// Only files ending in ".html" (case-sensitive) are inspected
pub fn is_html_file(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().ends_with(".html"))
}

pub async fn inspect_file<W: AsyncWrite + Unpin>(
    path: &Path,
    session: &InspectionSession<W>,
) -> Result<FileOutcome> {
    if !is_html_file(path) {
        return Ok(FileOutcome::Skipped);
    }

    let html = match fs::read_to_string(path).await {
        Ok(html) => html,
        Err(e) => {
            warn!("Skipping unreadable file '{}': {}", path.display(), e);
            return Ok(FileOutcome::Unreadable);
        }
    };

    let base_dir = containing_dir(path)?;
    let file = path.display().to_string();

    let not_found = find_not_found_links(&html, &base_dir)
        .into_iter()
        .map(|url| Finding::new(file.clone(), url, Reason::NotFound));
    let unclosed = find_unclosed_links(&html)
        .into_iter()
        .map(|url| Finding::new(file.clone(), url, Reason::UnclosedTag));
    let findings: Vec<Finding> = not_found.chain(unclosed).collect();

    let mut written = 0;
    for finding in findings {
        let kind = classify(&finding.url);
        debug!(
            file = %finding.file,
            url = %finding.url,
            reason = %finding.reason,
            ?kind,
            checkable = kind.is_checkable(),
            "Reporting link"
        );
        if session.emit(finding).await? {
            written += 1;
        }
    }

    Ok(FileOutcome::Inspected { written })
}

// Absolute path of the folder holding `path` ("page.html" -> "<cwd>")
fn containing_dir(path: &Path) -> Result<PathBuf> {
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    std::path::absolute(parent)
        .with_context(|| format!("cannot resolve folder of '{}'", path.display()))
}
