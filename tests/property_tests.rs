//! Property-based tests for gleason-quant
//!
//! These tests use proptest to verify invariants that must hold for all
//! inputs: classification totality, percentage accounting, ranking order,
//! and panel locator bounds.

use gleason_quant::{
    ClassCounts, ClassLabel, ColorClassifier, CountClasses, GradeSummary, Image, LocatePanel,
    PanelLayout,
};
use image::Rgb;
use proptest::prelude::*;

/// Strategy for generating RGB pixel values
fn rgb_pixel() -> impl Strategy<Value = Rgb<u8>> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb([r, g, b]))
}

/// Strategy for generating per-class pixel tallies
fn class_counts() -> impl Strategy<Value = ClassCounts> {
    (
        0u64..=1_000_000,
        0u64..=1_000_000,
        0u64..=1_000_000,
        0u64..=1_000_000,
        0u64..=1_000_000,
        0u64..=1_000_000,
    )
        .prop_map(|(gp3, gp4, gp5, white_bg, black_bg, other)| ClassCounts {
            gp3,
            gp4,
            gp5,
            white_bg,
            black_bg,
            other,
        })
}

/// Create an RGB image with the given dimensions and fill pattern
fn image_with_pattern(
    width: u32,
    height: u32,
    pattern: impl Fn(u32, u32) -> Rgb<u8>,
) -> Image<Rgb<u8>> {
    let mut image: Image<Rgb<u8>> = Image::new(width, height);
    for y in 0..height {
        for x in 0..width {
            image.put_pixel(x, y, pattern(x, y));
        }
    }
    image
}

proptest! {
    /// Property: classification is total and deterministic over all of RGB space
    #[test]
    fn classify_is_total_and_deterministic(pixel in rgb_pixel()) {
        let classifier = ColorClassifier::clinical();
        let label = classifier.classify(pixel);
        prop_assert!(matches!(
            label,
            ClassLabel::WhiteBg
                | ClassLabel::BlackBg
                | ClassLabel::Gp5
                | ClassLabel::Gp4
                | ClassLabel::Gp3
                | ClassLabel::Other
        ));
        prop_assert_eq!(classifier.classify(pixel), label);
    }

    /// Property: pattern and other shares account for all tissue whenever
    /// tissue is present
    #[test]
    fn percentages_sum_to_one_hundred(counts in class_counts()) {
        match GradeSummary::from_counts(&counts) {
            None => prop_assert_eq!(counts.tissue_total(), 0),
            Some(summary) => {
                let pattern_sum = summary.gp3_pct + summary.gp4_pct + summary.gp5_pct;
                let other_share = counts.other as f64 / counts.tissue_total() as f64 * 100.0;
                prop_assert!(
                    (pattern_sum + other_share - 100.0).abs() < 0.02,
                    "patterns {} + other {} should account for all tissue",
                    pattern_sum,
                    other_share
                );
            }
        }
    }

    /// Property: the dominant pattern carries the largest percentage
    #[test]
    fn dominant_is_largest_share(counts in class_counts()) {
        if let Some(summary) = GradeSummary::from_counts(&counts) {
            let max = summary.gp3_pct.max(summary.gp4_pct).max(summary.gp5_pct);
            let dominant_pct = match summary.dominant {
                "3" => summary.gp3_pct,
                "4" => summary.gp4_pct,
                "5" => summary.gp5_pct,
                other => panic!("unexpected dominant label {other}"),
            };
            prop_assert!((dominant_pct - max).abs() < 0.02);
        }
    }

    /// Property: secondary is absent exactly when at most one pattern has
    /// a nonzero share
    #[test]
    fn secondary_absent_only_for_zero_share(counts in class_counts()) {
        if let Some(summary) = GradeSummary::from_counts(&counts) {
            let nonzero_patterns = [counts.gp3, counts.gp4, counts.gp5]
                .iter()
                .filter(|&&count| count > 0)
                .count();
            match summary.secondary {
                None => prop_assert!(nonzero_patterns <= 1),
                Some(_) => prop_assert!(nonzero_patterns >= 2),
            }
        }
    }

    /// Property: the locator always returns a non-empty region no larger
    /// than the fixed-ratio band
    #[test]
    fn locator_stays_within_band(
        (width, height) in (3u32..=40, 3u32..=40),
        pixel in rgb_pixel()
    ) {
        let classifier = ColorClassifier::clinical();
        let layout = PanelLayout::default();
        let composite = image_with_pattern(width, height, |_, _| pixel);
        let panel = composite.locate_prediction_panel(&layout, &classifier);

        let band_width = (width as f32 * 0.66) as u32 - (width as f32 * 0.33) as u32;
        let band_height = (height as f32 * 0.95) as u32 - (height as f32 * 0.10) as u32;
        let (panel_width, panel_height) = panel.dimensions();
        prop_assert!(panel_width >= 1 && panel_height >= 1);
        prop_assert!(panel_width <= band_width.max(1));
        prop_assert!(panel_height <= band_height.max(1));
    }

    /// Property: counting classifies every pixel exactly once
    #[test]
    fn counts_cover_every_pixel(
        (width, height) in (1u32..=20, 1u32..=20),
        pixel in rgb_pixel()
    ) {
        let classifier = ColorClassifier::clinical();
        let image = image_with_pattern(width, height, |_, _| pixel);
        let counts = image.count_classes(&classifier);
        let total = counts.gp3
            + counts.gp4
            + counts.gp5
            + counts.white_bg
            + counts.black_bg
            + counts.other;
        prop_assert_eq!(total, u64::from(width) * u64::from(height));
    }
}
