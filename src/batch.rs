use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::gleason::aggregate::{CountClasses, GradeSummary};
use crate::gleason::classify::ColorClassifier;
use crate::gleason::panel::{LocatePanel, PanelLayout};
use crate::report::{write_report, ResultRecord};

/// Report destination relative to the working directory.
pub const DEFAULT_REPORT_PATH: &str = "out/gleason_percentages.csv";

/// Prefix that marks a file as a rendered prediction composite.
const PREDICTION_PREFIX: &str = "pred_";

/// Resolves the CLI input to the list of files to process.
///
/// A file path is taken as-is; a directory is scanned (non-recursively)
/// for `pred_*.png` entries, sorted by name.
pub fn find_prediction_files(input: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(PipelineError::MissingInput(input.to_path_buf()));
    }

    let entries = fs::read_dir(input).map_err(|source| PipelineError::Io {
        path: input.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PipelineError::Io {
            path: input.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_prediction_file(&path) {
            files.push(path);
        }
    }
    Ok(files.into_iter().sorted().collect())
}

fn is_prediction_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with(PREDICTION_PREFIX) && name.ends_with(".png"))
}

/// Runs the full pipeline on one composite file.
///
/// `Ok(None)` means the cropped panel held no tissue pixels; the caller
/// skips the file without failing the batch. `Err` covers decode and
/// filesystem failures, equally recoverable at the batch level.
pub fn process_file(
    path: &Path,
    classifier: &ColorClassifier,
    layout: &PanelLayout,
) -> Result<Option<ResultRecord>, PipelineError> {
    let composite = image::open(path)
        .map_err(|source| PipelineError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();

    let panel = composite.locate_prediction_panel(layout, classifier);
    let counts = panel.count_classes(classifier);

    let file = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());

    Ok(GradeSummary::from_counts(&counts).map(|summary| ResultRecord::new(file, &summary)))
}

/// What a batch run produced, for the caller's exit reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Rows written to the report.
    pub records: usize,
    /// Files with no detectable tissue.
    pub skipped: usize,
    /// Files that failed to decode or read.
    pub failed: usize,
    /// Written report path, `None` when every file was skipped or failed.
    pub report: Option<PathBuf>,
}

/// Processes every matching file under `input` and writes the CSV report.
///
/// Per-file failures and no-tissue panels are logged and skipped; the
/// batch only errors on setup problems (missing input, unreadable
/// directory) or on failure to write the report itself. No report file is
/// created when there are zero valid results.
pub fn run_batch(
    input: &Path,
    report_path: &Path,
    classifier: &ColorClassifier,
    layout: &PanelLayout,
) -> Result<BatchOutcome, PipelineError> {
    let files = find_prediction_files(input)?;
    if files.is_empty() {
        info!(input = %input.display(), "no prediction files found");
        return Ok(BatchOutcome {
            records: 0,
            skipped: 0,
            failed: 0,
            report: None,
        });
    }
    info!(count = files.len(), "processing prediction files");

    let results = classify_files(&files, classifier, layout);

    let mut records = Vec::new();
    let mut skipped = 0usize;
    let mut failed = 0usize;
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(Some(record)) => {
                info!(
                    file = %record.file,
                    gp3 = record.gp3_pct,
                    gp4 = record.gp4_pct,
                    gp5 = record.gp5_pct,
                    suggestion = %record.ai_suggestion,
                    "classified"
                );
                records.push(record);
            }
            Ok(None) => {
                warn!(file = %path.display(), "no tissue pixels detected, skipping");
                skipped += 1;
            }
            Err(error) => {
                warn!(file = %path.display(), %error, "failed to process, skipping");
                failed += 1;
            }
        }
    }

    if records.is_empty() {
        info!("no valid outputs");
        return Ok(BatchOutcome {
            records: 0,
            skipped,
            failed,
            report: None,
        });
    }

    write_report(report_path, &records)?;
    info!(report = %report_path.display(), rows = records.len(), "CSV saved");

    Ok(BatchOutcome {
        records: records.len(),
        skipped,
        failed,
        report: Some(report_path.to_path_buf()),
    })
}

/// Files are independent pure computations, so the rayon feature simply
/// fans them out; ordering is restored by the indexed collect.
#[cfg(feature = "rayon")]
fn classify_files(
    files: &[PathBuf],
    classifier: &ColorClassifier,
    layout: &PanelLayout,
) -> Vec<Result<Option<ResultRecord>, PipelineError>> {
    use rayon::prelude::*;
    files
        .par_iter()
        .map(|path| process_file(path, classifier, layout))
        .collect()
}

#[cfg(not(feature = "rayon"))]
fn classify_files(
    files: &[PathBuf],
    classifier: &ColorClassifier,
    layout: &PanelLayout,
) -> Vec<Result<Option<ResultRecord>, PipelineError>> {
    files
        .iter()
        .map(|path| process_file(path, classifier, layout))
        .collect()
}
