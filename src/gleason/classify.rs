use image::Rgb;

use super::palette::{ClassLabel, ReferencePalette};

/// Maps RGB pixels to semantic tissue classes.
///
/// Classification is a total function: any pixel that falls outside every
/// tolerance band of the palette resolves to [`ClassLabel::Other`]. The
/// palette's rule order is the tie-break for pixels within tolerance of
/// more than one class.
#[derive(Debug, Clone)]
pub struct ColorClassifier {
    palette: ReferencePalette,
}

impl ColorClassifier {
    pub const fn new(palette: ReferencePalette) -> Self {
        Self { palette }
    }

    /// Classifier over the fixed palette of the upstream renderer.
    pub fn clinical() -> Self {
        Self::new(ReferencePalette::clinical())
    }

    pub fn palette(&self) -> &ReferencePalette {
        &self.palette
    }

    /// First palette rule the pixel matches, or `Other`.
    pub fn classify(&self, pixel: Rgb<u8>) -> ClassLabel {
        self.palette
            .rules()
            .iter()
            .find(|rule| rule.matches(pixel))
            .map_or(ClassLabel::Other, |rule| rule.label())
    }

    /// White-background test used by the panel locator when tightening the
    /// crop. Only the `WHITE_BG` rule is consulted: black borders and
    /// legend text count as content for bounding-box purposes.
    pub fn is_white_background(&self, pixel: Rgb<u8>) -> bool {
        self.palette
            .rules()
            .iter()
            .filter(|rule| rule.label() == ClassLabel::WhiteBg)
            .any(|rule| rule.matches(pixel))
    }
}
