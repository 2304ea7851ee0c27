use std::path::PathBuf;

use thiserror::Error;

/// Error type for reference palette construction
///
/// Palettes are validated once at construction; classification itself
/// is total and has no error path.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    /// The palette contains no class rules at all
    #[error("Reference palette must contain at least one class rule")]
    EmptyPalette,

    /// A class rule was declared without any centroid colors
    #[error("Class {label} has no reference centroids")]
    EmptyClass { label: String },

    /// A tolerance is negative or not a finite number
    #[error("Class {label} has invalid tolerance {tolerance}")]
    InvalidTolerance { label: String, tolerance: f32 },
}

/// Error type for the batch pipeline and the conversion utility
///
/// Every variant is recoverable at the batch level: a failing file is
/// logged and skipped, the remaining files are still processed.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input path given on the command line does not exist
    #[error("Input path does not exist: {0}")]
    MissingInput(PathBuf),

    /// An image file could not be opened or decoded
    #[error("Failed to decode image {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A converted image could not be encoded or written
    #[error("Failed to encode image {path}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A filesystem operation failed
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV report could not be serialized or written
    #[error("Failed to write CSV report")]
    Report(#[from] csv::Error),
}
