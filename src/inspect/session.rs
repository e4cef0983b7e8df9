// src/inspect/session.rs
// =============================================================================
// Shared state for one run: the report sink plus what has already been
// written to it.
//
// Many file inspections run at the same time and all of them write into the
// same CSV file. A (file, url) pair must show up at most once per reason, so
// "was this written already? if not, write it and remember it" has to happen
// as one step. A single async Mutex guards the sink and both sets together.
// =============================================================================

use anyhow::Result;
use std::collections::HashSet;
use tokio::fs::File;
use tokio::io::AsyncWrite;
use tokio::sync::Mutex;

use crate::report::{CsvSink, Finding, Reason};

// (file, url)
type EmittedKey = (String, String);

pub struct InspectionSession<W = File> {
    state: Mutex<SessionState<W>>,
}

struct SessionState<W> {
    sink: CsvSink<W>,
    not_found: HashSet<EmittedKey>,
    unclosed: HashSet<EmittedKey>,
}

impl<W> SessionState<W> {
    fn emitted_mut(&mut self, reason: Reason) -> &mut HashSet<EmittedKey> {
        match reason {
            Reason::NotFound => &mut self.not_found,
            Reason::UnclosedTag => &mut self.unclosed,
        }
    }
}

impl<W: AsyncWrite + Unpin> InspectionSession<W> {
    pub fn new(sink: CsvSink<W>) -> Self {
        Self {
            state: Mutex::new(SessionState {
                sink,
                not_found: HashSet::new(),
                unclosed: HashSet::new(),
            }),
        }
    }

    /// Writes the finding unless the same (file, url) was already written
    /// for the same reason during this run.
    ///
    /// Returns Ok(true) if a row was written.
    pub async fn emit(&self, finding: Finding) -> Result<bool> {
        let mut state = self.state.lock().await;

        let key = (finding.file.clone(), finding.url.clone());
        if state.emitted_mut(finding.reason).contains(&key) {
            return Ok(false);
        }

        state.sink.write(&finding).await?;
        state.emitted_mut(finding.reason).insert(key);
        Ok(true)
    }
}
