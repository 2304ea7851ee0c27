use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::PipelineError;
use crate::gleason::aggregate::GradeSummary;

/// One CSV row of the report, produced per successfully processed file.
///
/// Field order is the report column order; the serde renames give the
/// header row its `GP*_pct` spelling.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub file: String,
    #[serde(rename = "GP3_pct")]
    pub gp3_pct: f64,
    #[serde(rename = "GP4_pct")]
    pub gp4_pct: f64,
    #[serde(rename = "GP5_pct")]
    pub gp5_pct: f64,
    pub dominant: String,
    /// Empty when no secondary pattern is present.
    pub secondary: String,
    pub ai_suggestion: String,
    pub tissue_pixels: u64,
    pub other_pixels: u64,
}

impl ResultRecord {
    pub fn new(file: impl Into<String>, summary: &GradeSummary) -> Self {
        Self {
            file: file.into(),
            gp3_pct: summary.gp3_pct,
            gp4_pct: summary.gp4_pct,
            gp5_pct: summary.gp5_pct,
            dominant: summary.dominant.to_owned(),
            secondary: summary.secondary.unwrap_or_default().to_owned(),
            ai_suggestion: summary.suggestion(),
            tissue_pixels: summary.tissue_pixels,
            other_pixels: summary.other_pixels,
        }
    }
}

/// Writes the report to `path`, creating parent directories as needed.
/// One header row, then one row per record in input order.
pub fn write_report(path: &Path, records: &[ResultRecord]) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| PipelineError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(|source| PipelineError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}
