// src/inspect/walker.rs
// =============================================================================
// Walks the source folder and inspects every file in it.
//
// Two stages run side by side, connected by a channel:
//
//   discovery  --(PathBuf)-->  inspection
//
// - Discovery walks the tree breadth-first (a VecDeque of folders still to
//   read) and sends every non-folder entry down the channel. Symlinks are
//   followed; a `visited` set of canonical folder paths stops link cycles.
// - Inspection spawns one tokio task per file into a JoinSet, never more
//   than MAX_CONCURRENT_INSPECTIONS at once.
//
// When discovery runs out of folders it drops the sender, inspection drains
// the JoinSet, and both stages return. No polling. If an inspection fails,
// dropping the JoinSet aborts every task still in flight, so nothing writes
// to the report after inspect_tree has returned.
//
// Rows are written as soon as a file finishes, so row order depends on
// which files finish first and is not stable between runs.
// =============================================================================

use anyhow::{Context, Result};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWrite;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

use super::file::{inspect_file, FileOutcome};
use super::InspectionSession;

// How many files are read and checked at the same time
const MAX_CONCURRENT_INSPECTIONS: usize = 50;

// How many discovered paths may wait for a free inspection slot
const DISCOVERY_BUFFER: usize = 256;

/// Totals for one run over a folder tree
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeReport {
    /// Non-folder entries found under the root
    pub files_seen: usize,
    /// .html files that were read and checked
    pub files_inspected: usize,
    /// .html files that could not be read
    pub files_unreadable: usize,
    /// Rows added to the report
    pub findings_written: usize,
}

impl TreeReport {
    fn record(&mut self, outcome: FileOutcome) {
        self.files_seen += 1;
        match outcome {
            FileOutcome::Skipped => {}
            FileOutcome::Unreadable => self.files_unreadable += 1,
            FileOutcome::Inspected { written } => {
                self.files_inspected += 1;
                self.findings_written += written;
            }
        }
    }

    fn record_joined(&mut self, joined: Result<Result<FileOutcome>, JoinError>) -> Result<()> {
        let outcome = joined.context("file inspection task panicked")??;
        self.record(outcome);
        Ok(())
    }
}

// Inspects every file under `root`, writing findings through `session`
//
// Errors:
//   - the root folder cannot be read
//   - a finding cannot be written to the report
// Unreadable sub-folders and files are logged and skipped.
pub async fn inspect_tree<W>(root: &Path, session: Arc<InspectionSession<W>>) -> Result<TreeReport>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(DISCOVERY_BUFFER);

    let discovery = discover_files(root.to_path_buf(), tx);
    let inspection = inspect_discovered(rx, session);

    let ((), report) = tokio::try_join!(discovery, inspection)?;
    Ok(report)
}

// Breadth-first walk; sends every non-folder entry to `tx`
async fn discover_files(root: PathBuf, tx: mpsc::Sender<PathBuf>) -> Result<()> {
    let mut pending = VecDeque::from([root.clone()]);
    // Canonical paths of folders already listed
    let mut visited = HashSet::new();

    while let Some(folder) = pending.pop_front() {
        let entries = match read_folder(&folder, &mut visited).await {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                debug!("Skipping folder '{}': already inspected", folder.display());
                continue;
            }
            Err(e) if folder == root => return Err(e),
            Err(e) => {
                warn!("Skipping unreadable folder '{}': {:#}", folder.display(), e);
                continue;
            }
        };

        for (path, is_dir) in entries {
            if is_dir {
                pending.push_back(path);
            } else if tx.send(path).await.is_err() {
                // Inspection has stopped (it failed); its error is the one reported
                return Ok(());
            }
        }
    }

    Ok(())
}

// Lists one folder as (path, is_dir) pairs
//
// Returns Ok(None) when the folder (or the folder a symlink points at) was
// already listed during this run.
async fn read_folder(
    folder: &Path,
    visited: &mut HashSet<PathBuf>,
) -> Result<Option<Vec<(PathBuf, bool)>>> {
    let canonical = fs::canonicalize(folder)
        .await
        .with_context(|| format!("cannot resolve folder '{}'", folder.display()))?;
    if !visited.insert(canonical) {
        return Ok(None);
    }

    info!("Inspecting folder '{}'", folder.display());

    let mut reader = fs::read_dir(folder)
        .await
        .with_context(|| format!("cannot read folder '{}'", folder.display()))?;

    let mut entries = Vec::new();
    while let Some(entry) = reader
        .next_entry()
        .await
        .with_context(|| format!("cannot list folder '{}'", folder.display()))?
    {
        let path = entry.path();
        // metadata() follows symlinks; a dangling link is handed on as a file
        let is_dir = fs::metadata(&path)
            .await
            .map(|meta| meta.is_dir())
            .unwrap_or(false);
        entries.push((path, is_dir));
    }

    Ok(Some(entries))
}

// Runs inspect_file for everything that arrives on `rx`, a bounded number at a time
async fn inspect_discovered<W>(
    mut rx: mpsc::Receiver<PathBuf>,
    session: Arc<InspectionSession<W>>,
) -> Result<TreeReport>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    // Dropping the set (on an early return) aborts whatever is still running
    let mut in_flight = JoinSet::new();
    let mut report = TreeReport::default();

    while let Some(path) = rx.recv().await {
        if in_flight.len() >= MAX_CONCURRENT_INSPECTIONS {
            if let Some(joined) = in_flight.join_next().await {
                report.record_joined(joined)?;
            }
        }

        let session = Arc::clone(&session);
        in_flight.spawn(async move { inspect_file(&path, &session).await });
    }

    while let Some(joined) = in_flight.join_next().await {
        report.record_joined(joined)?;
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::CsvSink;
    use std::fs as std_fs;
    use std::io;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::task::{Context as TaskContext, Poll};
    use tempfile::TempDir;

    async fn session_in(dir: &TempDir) -> (Arc<InspectionSession>, PathBuf) {
        let path = dir.path().join("report.csv");
        let session = InspectionSession::new(CsvSink::create(&path).await.unwrap());
        (Arc::new(session), path)
    }

    fn sorted_rows(path: &Path) -> (String, Vec<String>) {
        let text = std_fs::read_to_string(path).unwrap();
        let mut lines = text.lines().map(str::to_string);
        let header = lines.next().unwrap();
        let mut rows: Vec<String> = lines.collect();
        rows.sort();
        (header, rows)
    }

    // Accepts the first `allowed` writes, then fails every write after that
    struct FailingWriter {
        writes: Arc<AtomicUsize>,
        allowed: usize,
    }

    impl AsyncWrite for FailingWriter {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut TaskContext<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let attempt = self.writes.fetch_add(1, Ordering::SeqCst);
            if attempt < self.allowed {
                Poll::Ready(Ok(buf.len()))
            } else {
                Poll::Ready(Err(io::Error::other("disk full")))
            }
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut TaskContext<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_tree_end_to_end() {
        let site = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let root = site.path();

        std_fs::create_dir_all(root.join("a/b")).unwrap();
        // One broken link and one tag that is never closed (its target exists)
        std_fs::write(
            root.join("a/1.html"),
            r#"<p><a href="missing.html">broken</a> <a href="open.html">never closed</p>"#,
        )
        .unwrap();
        std_fs::write(root.join("a/open.html"), "<p>target</p>").unwrap();
        std_fs::write(root.join("a/b/2.html"), r#"<a href="../open.html">fine</a>"#).unwrap();
        // Would produce findings if it were inspected
        std_fs::write(root.join("readme.txt"), r#"<a href="nowhere.html">"#).unwrap();

        let (session, report_path) = session_in(&out).await;
        let report = inspect_tree(root, session).await.unwrap();

        assert_eq!(report.files_seen, 4);
        assert_eq!(report.files_inspected, 3);
        assert_eq!(report.findings_written, 2);

        let page = root.join("a/1.html").display().to_string();
        let (header, rows) = sorted_rows(&report_path);
        assert_eq!(header, r#""file","url","reason""#);
        assert_eq!(
            rows,
            vec![
                format!(r#""{page}","missing.html","Not found""#),
                format!(r#""{page}","open.html","Unclosed tag""#),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_tree_writes_header_only() {
        let site = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let (session, report_path) = session_in(&out).await;

        let report = inspect_tree(site.path(), session).await.unwrap();
        assert_eq!(report, TreeReport::default());

        let (header, rows) = sorted_rows(&report_path);
        assert_eq!(header, r#""file","url","reason""#);
        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let out = TempDir::new().unwrap();
        let (session, _) = session_in(&out).await;
        let result = inspect_tree(&out.path().join("does-not-exist"), session).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_unreadable_file_does_not_stop_the_run() {
        let site = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        std_fs::write(site.path().join("bad.html"), [0xc3, 0x28]).unwrap();
        std_fs::write(site.path().join("good.html"), r#"<a href="gone.html">x</a>"#).unwrap();

        let (session, report_path) = session_in(&out).await;
        let report = inspect_tree(site.path(), session).await.unwrap();

        assert_eq!(report.files_unreadable, 1);
        assert_eq!(report.files_inspected, 1);
        let (_, rows) = sorted_rows(&report_path);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].ends_with(r#""gone.html","Not found""#));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_many_files_more_than_the_worker_limit() {
        let site = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();
        let total = MAX_CONCURRENT_INSPECTIONS * 3;
        for i in 0..total {
            let folder = site.path().join(format!("d{}", i % 7));
            std_fs::create_dir_all(&folder).unwrap();
            std_fs::write(
                folder.join(format!("{i}.html")),
                format!(r#"<a href="missing-{i}.html">x</a>"#),
            )
            .unwrap();
        }

        let (session, report_path) = session_in(&out).await;
        let report = inspect_tree(site.path(), session).await.unwrap();

        assert_eq!(report.files_inspected, total);
        assert_eq!(report.findings_written, total);
        let (_, rows) = sorted_rows(&report_path);
        assert_eq!(rows.len(), total);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_folder_is_inspected() {
        let site = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        std_fs::write(
            elsewhere.path().join("p.html"),
            r#"<a href="gone.html">x</a>"#,
        )
        .unwrap();
        std::os::unix::fs::symlink(elsewhere.path(), site.path().join("linked")).unwrap();

        let (session, report_path) = session_in(&out).await;
        let report = inspect_tree(site.path(), session).await.unwrap();

        assert_eq!(report.files_inspected, 1);
        let page = site.path().join("linked/p.html").display().to_string();
        let (_, rows) = sorted_rows(&report_path);
        assert_eq!(rows, vec![format!(r#""{page}","gone.html","Not found""#)]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_cycle_is_listed_once() {
        let site = TempDir::new().unwrap();
        let out = TempDir::new().unwrap();

        std_fs::create_dir(site.path().join("sub")).unwrap();
        std_fs::write(site.path().join("sub/p.html"), r#"<a href="gone.html">x</a>"#).unwrap();
        // sub/back -> root, so root -> sub -> back -> root ...
        std::os::unix::fs::symlink(site.path(), site.path().join("sub/back")).unwrap();

        let (session, report_path) = session_in(&out).await;
        let report = inspect_tree(site.path(), session).await.unwrap();

        assert_eq!(report.files_seen, 1);
        assert_eq!(report.findings_written, 1);
        let (_, rows) = sorted_rows(&report_path);
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_stops_every_inspection() {
        let site = TempDir::new().unwrap();
        for i in 0..20 {
            std_fs::write(
                site.path().join(format!("{i}.html")),
                format!(r#"<a href="missing-{i}.html">x</a>"#),
            )
            .unwrap();
        }

        let writes = Arc::new(AtomicUsize::new(0));
        let writer = FailingWriter {
            writes: Arc::clone(&writes),
            // Only the header gets through
            allowed: 1,
        };
        let session = Arc::new(InspectionSession::new(
            CsvSink::from_writer(writer).await.unwrap(),
        ));

        let result = inspect_tree(site.path(), session).await;
        assert!(result.is_err());

        // Tasks still running when the error surfaced must have been aborted
        let attempts_at_return = writes.load(Ordering::SeqCst);
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        assert_eq!(writes.load(Ordering::SeqCst), attempts_at_return);
    }
}
