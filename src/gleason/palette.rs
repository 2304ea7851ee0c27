use image::Rgb;

use crate::error::PaletteError;

/// Euclidean distance in RGB space below which a pixel counts as background.
pub const BACKGROUND_TOLERANCE: f32 = 12.0;

/// Euclidean distance in RGB space below which a pixel counts as a
/// Gleason-pattern color.
pub const CLASS_TOLERANCE: f32 = 18.0;

/// Semantic class of a single pixel in a rendered prediction panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassLabel {
    /// Near-white panel background
    WhiteBg,
    /// Near-black panel background (borders, text)
    BlackBg,
    /// Gleason pattern 5 tissue
    Gp5,
    /// Gleason pattern 4 tissue
    Gp4,
    /// Gleason pattern 3 tissue
    Gp3,
    /// Anything outside every reference tolerance band
    Other,
}

impl ClassLabel {
    /// Stable identifier used in diagnostics and palette errors.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WhiteBg => "WHITE_BG",
            Self::BlackBg => "BLACK_BG",
            Self::Gp5 => "GP5",
            Self::Gp4 => "GP4",
            Self::Gp3 => "GP3",
            Self::Other => "OTHER",
        }
    }

    /// `true` for the two background classes.
    pub const fn is_background(self) -> bool {
        matches!(self, Self::WhiteBg | Self::BlackBg)
    }

    /// Report digit for the three pattern classes, `None` otherwise.
    pub const fn pattern_digit(self) -> Option<&'static str> {
        match self {
            Self::Gp3 => Some("3"),
            Self::Gp4 => Some("4"),
            Self::Gp5 => Some("5"),
            _ => None,
        }
    }
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ordered matching rule: a label, its reference centroids, and the
/// distance tolerance applied to all of them.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRule {
    label: ClassLabel,
    centroids: Vec<[u8; 3]>,
    tolerance: f32,
}

impl ClassRule {
    pub fn new(
        label: ClassLabel,
        centroids: Vec<[u8; 3]>,
        tolerance: f32,
    ) -> Result<Self, PaletteError> {
        if centroids.is_empty() {
            return Err(PaletteError::EmptyClass {
                label: label.as_str().to_owned(),
            });
        }
        if !tolerance.is_finite() || tolerance < 0.0 {
            return Err(PaletteError::InvalidTolerance {
                label: label.as_str().to_owned(),
                tolerance,
            });
        }
        Ok(Self {
            label,
            centroids,
            tolerance,
        })
    }

    pub const fn label(&self) -> ClassLabel {
        self.label
    }

    /// `true` when the pixel lies within this rule's tolerance of any of
    /// its centroids. Distances are compared squared so the per-pixel hot
    /// path never takes a square root.
    pub fn matches(&self, pixel: Rgb<u8>) -> bool {
        let limit = self.tolerance * self.tolerance;
        self.centroids
            .iter()
            .any(|centroid| distance_squared(*centroid, pixel) <= limit)
    }
}

/// Squared Euclidean distance between a reference centroid and a pixel.
fn distance_squared(centroid: [u8; 3], pixel: Rgb<u8>) -> f32 {
    let Rgb([r, g, b]) = pixel;
    let dr = f32::from(centroid[0]) - f32::from(r);
    let dg = f32::from(centroid[1]) - f32::from(g);
    let db = f32::from(centroid[2]) - f32::from(b);
    dr.mul_add(dr, dg.mul_add(dg, db * db))
}

/// Immutable, ordered set of class rules.
///
/// Rule order is the classification priority: earlier rules win when a
/// pixel falls within tolerance of several classes. The clinical palette
/// checks backgrounds first, then GP5 before GP4 before GP3 so that an
/// ambiguous pixel resolves to the more severe pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferencePalette {
    rules: Vec<ClassRule>,
}

impl ReferencePalette {
    pub fn new(rules: Vec<ClassRule>) -> Result<Self, PaletteError> {
        if rules.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        Ok(Self { rules })
    }

    /// The fixed palette of the upstream visualization renderer.
    ///
    /// Centroids were sampled from rendered prediction panels; the GP5
    /// pink/red and GP4 blue/light-blue pairs cover the two shades each
    /// pattern is drawn with.
    pub fn clinical() -> Self {
        let rules = vec![
            rule(
                ClassLabel::WhiteBg,
                vec![
                    [255, 255, 255],
                    [254, 254, 254],
                    [253, 253, 253],
                    [251, 251, 251],
                ],
                BACKGROUND_TOLERANCE,
            ),
            rule(
                ClassLabel::BlackBg,
                vec![[0, 0, 0], [1, 0, 0], [2, 0, 0]],
                BACKGROUND_TOLERANCE,
            ),
            rule(
                ClassLabel::Gp5,
                vec![[251, 184, 157], [243, 75, 54]],
                CLASS_TOLERANCE,
            ),
            rule(
                ClassLabel::Gp4,
                vec![[106, 173, 213], [183, 212, 234]],
                CLASS_TOLERANCE,
            ),
            rule(ClassLabel::Gp3, vec![[164, 218, 158]], CLASS_TOLERANCE),
        ];
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassRule] {
        &self.rules
    }
}

/// Clinical palette constants are known-valid, so this bypasses the
/// fallible constructor.
fn rule(label: ClassLabel, centroids: Vec<[u8; 3]>, tolerance: f32) -> ClassRule {
    ClassRule {
        label,
        centroids,
        tolerance,
    }
}
