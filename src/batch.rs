use std::fmt;
use std::fs::read_dir;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{ExtractError, Result};
use crate::pipeline::{self, Extraction};

/// Where to look for surveys and where to put their tables.
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub out_dir: PathBuf,
    /// File extension (without the dot) that marks a survey file.
    pub extension: String,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions {
            out_dir: PathBuf::from("."),
            extension: "sgy".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub input: String,
    pub output_key: String,
    pub output: String,
    pub traces: usize,
    pub samples: usize,
    pub rows: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub input: String,
    pub output_key: String,
    pub kind: &'static str,
    pub message: String,
}

/// The line shown to the user when a file is skipped.
impl fmt::Display for FileFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to extract {}: {}", self.input, self.message)
    }
}

/// Per-file results of a whole run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub succeeded: Vec<FileOutcome>,
    pub failed: Vec<FileFailure>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Reported once per survey file as the batch advances.
#[derive(Debug)]
pub enum Progress<'a> {
    Saved(&'a FileOutcome),
    Failed(&'a FileFailure),
}

/// `<parent folder name>_<file stem>`, e.g. `LINE_A/LINE_A_01.sgy` → `LINE_A_LINE_A_01`.
pub fn output_key(path: &Path) -> String {
    let folder = path
        .parent()
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    format!("{folder}_{stem}")
}

/// Every regular file under `root` whose extension is exactly `extension`,
/// in sorted order.
///
/// An unreadable `root` is an error; unreadable subdirectories are logged and
/// skipped.
pub fn find_survey_files(root: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let entries = read_dir(root).map_err(|e| ExtractError::io(root, e))?;
    walk_directory(entries, extension, &mut found);
    Ok(found)
}

fn walk_directory(entries: std::fs::ReadDir, extension: &str, found: &mut Vec<PathBuf>) {
    let mut entries: Vec<_> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                log::warn!("Skipping unreadable directory entry: {e}");
                None
            }
        })
        .collect();
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);

        if is_dir {
            match read_dir(&path) {
                Ok(sub) => walk_directory(sub, extension, found),
                Err(e) => log::warn!("Skipping unreadable directory {}: {e}", path.display()),
            }
        } else if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            found.push(path);
        }
    }
}

/// Extract every survey under `root`, isolating failures per file.
///
/// A failing file is recorded in the report and the walk moves on; only a
/// missing or unreadable `root` aborts the run.
pub fn run<F>(root: &Path, options: &BatchOptions, mut progress: F) -> Result<BatchReport>
where
    F: FnMut(Progress<'_>),
{
    let files = find_survey_files(root, &options.extension)?;
    log::debug!(
        "Found {} .{} files under {}",
        files.len(),
        options.extension,
        root.display()
    );

    let mut report = BatchReport::default();
    for input in files {
        let key = output_key(&input);
        match pipeline::extract(&input, &key, &options.out_dir) {
            Ok(extraction) => {
                report.succeeded.push(outcome(&input, key, extraction));
                if let Some(saved) = report.succeeded.last() {
                    progress(Progress::Saved(saved));
                }
            }
            Err(e) => {
                log::debug!("{} failed ({}): {e}", input.display(), e.kind());
                report.failed.push(FileFailure {
                    input: input.display().to_string(),
                    output_key: key,
                    kind: e.kind(),
                    message: e.to_string(),
                });
                if let Some(failed) = report.failed.last() {
                    progress(Progress::Failed(failed));
                }
            }
        }
    }

    Ok(report)
}

fn outcome(input: &Path, output_key: String, extraction: Extraction) -> FileOutcome {
    FileOutcome {
        input: input.display().to_string(),
        output_key,
        output: extraction.output.display().to_string(),
        traces: extraction.trace_count,
        samples: extraction.sample_count,
        rows: extraction.rows,
    }
}
