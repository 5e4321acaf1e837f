//! Batch runner: edit several files concurrently.
//!
//! Each distinct file gets exactly one in-flight edit. A failure on one file
//! is recorded in its report and never stops the others.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use streamtag_av::{change_metadata, EditOutcome, ToolRegistry};
use streamtag_core::config::EditConfig;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Outcome of one file in a batch.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub result: Result<EditOutcome, streamtag_core::Error>,
}

impl FileReport {
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

/// Serializable summary line for `--json` style output.
#[derive(Debug, Serialize)]
pub struct ReportLine<'a> {
    pub path: &'a Path,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<&'a EditOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<'a> From<&'a FileReport> for ReportLine<'a> {
    fn from(report: &'a FileReport) -> Self {
        match &report.result {
            Ok(outcome) => ReportLine {
                path: &report.path,
                outcome: Some(outcome),
                error: None,
            },
            Err(e) => ReportLine {
                path: &report.path,
                outcome: None,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Drop repeated paths, comparing canonical forms where they resolve.
/// The first spelling of each file is kept, in input order.
pub fn dedupe_paths(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen = HashSet::new();
    files
        .iter()
        .filter(|path| {
            let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            seen.insert(key)
        })
        .cloned()
        .collect()
}

/// Set the title of every file in `files`, running up to `jobs` edits at
/// once. Reports come back in input order, one per distinct file.
pub async fn retag_files(
    files: &[PathBuf],
    title: &str,
    tools: Arc<ToolRegistry>,
    config: Arc<EditConfig>,
    jobs: usize,
) -> Vec<FileReport> {
    let files = dedupe_paths(files);
    let permits = Arc::new(Semaphore::new(jobs.max(1)));
    let title: Arc<str> = Arc::from(title);

    let mut set = JoinSet::new();
    for (position, path) in files.iter().cloned().enumerate() {
        let permits = Arc::clone(&permits);
        let tools = Arc::clone(&tools);
        let config = Arc::clone(&config);
        let title = Arc::clone(&title);

        set.spawn(async move {
            let result = match permits.acquire_owned().await {
                Ok(_permit) => change_metadata(&path, &title, &tools, &config).await,
                Err(e) => Err(streamtag_core::Error::tool("batch", e.to_string())),
            };
            (position, FileReport { path, result })
        });
    }

    let mut reports: Vec<Option<FileReport>> = (0..files.len()).map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((position, report)) => reports[position] = Some(report),
            Err(e) => tracing::error!("edit task panicked: {e}"),
        }
    }

    reports
        .into_iter()
        .zip(files)
        .map(|(report, path)| {
            report.unwrap_or_else(|| FileReport {
                path,
                result: Err(streamtag_core::Error::tool("batch", "edit task did not complete")),
            })
        })
        .collect()
}
