//! Batch RGB normalization for raw source images.
//!
//! Separate from the classification pipeline: this utility prepares model
//! inputs by re-encoding arbitrary raster files (RGBA, CMYK-decoded JPEG,
//! grayscale) as plain RGB PNGs and listing the results. It shares no
//! logic with the classifier.

use std::fs;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use tracing::{info, warn};

use crate::error::PipelineError;

/// Raster extensions accepted as conversion input, lowercase.
const INPUT_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "bmp"];

/// Directory created under the output root for converted files.
const CONVERTED_DIR: &str = "converted_rgb";

/// File listing every converted path, one per line.
const LIST_FILE: &str = "_converted_list.txt";

/// Scans `dir` (non-recursively) for convertible raster files, sorted by
/// name. Files named `pred_*` are pipeline outputs that ended up next to
/// the inputs; they are never treated as conversion sources.
pub fn find_source_images(dir: &Path) -> Result<Vec<PathBuf>, PipelineError> {
    if !dir.is_dir() {
        return Err(PipelineError::MissingInput(dir.to_path_buf()));
    }
    let entries = fs::read_dir(dir).map_err(|source| PipelineError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PipelineError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && is_source_image(&path) {
            files.push(path);
        }
    }
    Ok(files.into_iter().sorted().collect())
}

fn is_source_image(path: &Path) -> bool {
    let has_input_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| INPUT_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
    let is_prediction_output = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.to_lowercase().starts_with("pred_"));
    has_input_extension && !is_prediction_output
}

/// What a conversion run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOutcome {
    /// Paths of the written RGB PNGs, in input order.
    pub converted: Vec<PathBuf>,
    /// Files that failed to decode or re-encode.
    pub failed: usize,
}

/// Converts every source image in `img_dir` to an RGB PNG under
/// `<out_dir>/converted_rgb/` and writes the converted-path list there.
///
/// Per-file decode or encode failures are logged and skipped. Returns
/// without writing a list when the input directory holds no images.
pub fn convert_directory(img_dir: &Path, out_dir: &Path) -> Result<ConvertOutcome, PipelineError> {
    // First run scaffolds the input directory so the user has somewhere to
    // drop images.
    fs::create_dir_all(img_dir).map_err(|source| PipelineError::Io {
        path: img_dir.to_path_buf(),
        source,
    })?;
    let files = find_source_images(img_dir)?;
    if files.is_empty() {
        info!(input = %img_dir.display(), "no images found, copy images there and run again");
        return Ok(ConvertOutcome {
            converted: Vec::new(),
            failed: 0,
        });
    }

    let conv_dir = out_dir.join(CONVERTED_DIR);
    fs::create_dir_all(&conv_dir).map_err(|source| PipelineError::Io {
        path: conv_dir.clone(),
        source,
    })?;
    info!(count = files.len(), "converting to RGB PNG");

    let mut converted = Vec::new();
    let mut failed = 0usize;
    for path in &files {
        match convert_file(path, &conv_dir) {
            Ok(target) => {
                info!(file = %target.display(), "converted");
                converted.push(target);
            }
            Err(error) => {
                warn!(file = %path.display(), %error, "conversion failed, skipping");
                failed += 1;
            }
        }
    }

    let list_path = conv_dir.join(LIST_FILE);
    let listing: String = converted
        .iter()
        .map(|path| format!("{}\n", path.display()))
        .collect();
    fs::write(&list_path, listing).map_err(|source| PipelineError::Io {
        path: list_path.clone(),
        source,
    })?;
    info!(list = %list_path.display(), "converted list saved");

    Ok(ConvertOutcome { converted, failed })
}

/// Decodes one file, flattens it to RGB, and writes `<stem>.png` into
/// `conv_dir`.
fn convert_file(path: &Path, conv_dir: &Path) -> Result<PathBuf, PipelineError> {
    let stem = path
        .file_stem()
        .map_or_else(|| "image".to_owned(), |stem| stem.to_string_lossy().into_owned());
    let target = conv_dir.join(format!("{stem}.png"));

    let rgb = image::open(path)
        .map_err(|source| PipelineError::Decode {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgb8();
    rgb.save(&target).map_err(|source| PipelineError::Encode {
        path: target.clone(),
        source,
    })?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_images_match_raster_extensions() {
        assert!(is_source_image(Path::new("images/slide.png")));
        assert!(is_source_image(Path::new("images/slide.JPG")));
        assert!(is_source_image(Path::new("images/scan.tiff")));
        assert!(!is_source_image(Path::new("images/notes.txt")));
        assert!(!is_source_image(Path::new("images/slide")));
    }

    #[test]
    fn prediction_outputs_are_not_conversion_sources() {
        assert!(!is_source_image(Path::new("images/pred_0001.png")));
        assert!(!is_source_image(Path::new("images/PRED_0001.png")));
    }
}
