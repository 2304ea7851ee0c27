use image::Rgb;
use imageproc::definitions::Image;
use itertools::Itertools;

use super::classify::ColorClassifier;
use super::palette::ClassLabel;

/// Per-class pixel tallies over one panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassCounts {
    pub gp3: u64,
    pub gp4: u64,
    pub gp5: u64,
    pub white_bg: u64,
    pub black_bg: u64,
    pub other: u64,
}

impl ClassCounts {
    pub fn tally(&mut self, label: ClassLabel) {
        match label {
            ClassLabel::Gp3 => self.gp3 += 1,
            ClassLabel::Gp4 => self.gp4 += 1,
            ClassLabel::Gp5 => self.gp5 += 1,
            ClassLabel::WhiteBg => self.white_bg += 1,
            ClassLabel::BlackBg => self.black_bg += 1,
            ClassLabel::Other => self.other += 1,
        }
    }

    /// Everything that is not background. `OTHER` pixels are tissue for
    /// denominator purposes even though they carry no pattern.
    pub const fn tissue_total(&self) -> u64 {
        self.gp3 + self.gp4 + self.gp5 + self.other
    }
}

/// Classifies every pixel of a panel into [`ClassCounts`].
pub trait CountClasses {
    fn count_classes(&self, classifier: &ColorClassifier) -> ClassCounts;
}

impl CountClasses for Image<Rgb<u8>> {
    fn count_classes(&self, classifier: &ColorClassifier) -> ClassCounts {
        let mut counts = ClassCounts::default();
        for pixel in self.pixels() {
            counts.tally(classifier.classify(*pixel));
        }
        counts
    }
}

/// Pattern percentages and the dominant/secondary call for one panel.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeSummary {
    /// Pattern shares of the tissue area, rounded to two decimals.
    pub gp3_pct: f64,
    pub gp4_pct: f64,
    pub gp5_pct: f64,
    /// Pattern digit with the largest tissue share.
    pub dominant: &'static str,
    /// Second-largest pattern, present only when its share is nonzero.
    pub secondary: Option<&'static str>,
    pub tissue_pixels: u64,
    pub other_pixels: u64,
}

impl GradeSummary {
    /// Derives the summary from pixel tallies.
    ///
    /// Returns `None` when the panel holds no tissue at all; callers treat
    /// that as a per-file skip. Percentages are taken over the tissue-only
    /// denominator, so backgrounds never dilute the pattern shares.
    ///
    /// Ranking uses the unrounded percentages and a stable descending sort
    /// over the (3, 4, 5) input order: equal shares resolve to the lower
    /// pattern number.
    pub fn from_counts(counts: &ClassCounts) -> Option<Self> {
        let tissue_total = counts.tissue_total();
        if tissue_total == 0 {
            return None;
        }

        let percentage = |count: u64| count as f64 / tissue_total as f64 * 100.0;
        let gp3 = percentage(counts.gp3);
        let gp4 = percentage(counts.gp4);
        let gp5 = percentage(counts.gp5);

        let ranked: Vec<(&'static str, f64)> = [("3", gp3), ("4", gp4), ("5", gp5)]
            .into_iter()
            .sorted_by(|a, b| b.1.total_cmp(&a.1))
            .collect();
        let dominant = ranked[0].0;
        let secondary = (ranked[1].1 > 0.0).then_some(ranked[1].0);

        Some(Self {
            gp3_pct: round2(gp3),
            gp4_pct: round2(gp4),
            gp5_pct: round2(gp5),
            dominant,
            secondary,
            tissue_pixels: tissue_total,
            other_pixels: counts.other,
        })
    }

    /// `"{dominant}+{secondary}"`, or just the dominant digit when no
    /// secondary pattern is present.
    pub fn suggestion(&self) -> String {
        match self.secondary {
            Some(secondary) => format!("{}+{}", self.dominant, secondary),
            None => self.dominant.to_owned(),
        }
    }
}

/// Round to two decimals, halves away from zero (`f64::round` semantics).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
