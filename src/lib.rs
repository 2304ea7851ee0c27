mod batch;
mod convert;
mod error;
mod gleason;
mod report;

use image::{ImageBuffer, Pixel};

pub use batch::{
    find_prediction_files, process_file, run_batch, BatchOutcome, DEFAULT_REPORT_PATH,
};
pub use convert::{convert_directory, find_source_images, ConvertOutcome};
pub use error::{PaletteError, PipelineError};
pub use gleason::aggregate::{ClassCounts, CountClasses, GradeSummary};
pub use gleason::classify::ColorClassifier;
pub use gleason::palette::{
    ClassLabel, ClassRule, ReferencePalette, BACKGROUND_TOLERANCE, CLASS_TOLERANCE,
};
pub use gleason::panel::{LocatePanel, PanelLayout};
pub use report::{write_report, ResultRecord};

pub type Image<P> = ImageBuffer<P, Vec<<P as Pixel>::Subpixel>>;
