use image::{GenericImageView, Rgb};
use imageproc::definitions::Image;

use super::classify::ColorClassifier;

/// Geometry of the three-panel composite produced by the upstream renderer
/// (source image, prediction overlay, color legend, side by side).
///
/// The fractions select the middle band where the prediction panel sits by
/// layout convention; it is not auto-detected. `min_content_pixels` guards
/// the content tightening step against degenerate panels, `padding` is the
/// margin kept around the detected content box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub left_frac: f32,
    pub right_frac: f32,
    pub top_frac: f32,
    pub bottom_frac: f32,
    pub min_content_pixels: u64,
    pub padding: u32,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            left_frac: 0.33,
            right_frac: 0.66,
            top_frac: 0.10,
            bottom_frac: 0.95,
            min_content_pixels: 1000,
            padding: 5,
        }
    }
}

impl PanelLayout {
    /// Band rectangle `(x, y, width, height)` for a composite of the given
    /// dimensions. Fractions truncate to pixel coordinates; the result is
    /// clamped to a non-empty rectangle inside the image.
    fn band(&self, width: u32, height: u32) -> (u32, u32, u32, u32) {
        let x1 = ((width as f32 * self.left_frac) as u32).min(width - 1);
        let x2 = ((width as f32 * self.right_frac) as u32).clamp(x1 + 1, width);
        let y1 = ((height as f32 * self.top_frac) as u32).min(height - 1);
        let y2 = ((height as f32 * self.bottom_frac) as u32).clamp(y1 + 1, height);
        (x1, y1, x2 - x1, y2 - y1)
    }
}

/// Extracts the prediction panel from a composite visualization.
pub trait LocatePanel {
    /// Crops the fixed-ratio middle band, then tightens it to the bounding
    /// box of non-white-background content.
    ///
    /// When the band holds fewer than `layout.min_content_pixels` content
    /// pixels the band is returned untightened. The result is always a
    /// non-empty sub-rectangle of the band.
    fn locate_prediction_panel(
        &self,
        layout: &PanelLayout,
        classifier: &ColorClassifier,
    ) -> Self;
}

impl LocatePanel for Image<Rgb<u8>> {
    fn locate_prediction_panel(
        &self,
        layout: &PanelLayout,
        classifier: &ColorClassifier,
    ) -> Self {
        let (width, height) = self.dimensions();
        if width == 0 || height == 0 {
            return self.clone();
        }

        let (bx, by, bw, bh) = layout.band(width, height);
        let band = self.view(bx, by, bw, bh).to_image();

        let mut bounds = [bw, bh, 0, 0]; // [x1, y1, x2, y2]
        let mut content_pixels = 0u64;
        for (x, y, pixel) in band.enumerate_pixels() {
            if !classifier.is_white_background(*pixel) {
                content_pixels += 1;
                update_bounds(&mut bounds, x, y);
            }
        }

        if content_pixels < layout.min_content_pixels {
            return band;
        }

        let pad = layout.padding;
        let left = bounds[0].saturating_sub(pad);
        let top = bounds[1].saturating_sub(pad);
        let right = (bounds[2] + pad).min(bw - 1);
        let bottom = (bounds[3] + pad).min(bh - 1);

        band.view(left, top, right - left + 1, bottom - top + 1)
            .to_image()
    }
}

fn update_bounds(bounds: &mut [u32; 4], x: u32, y: u32) {
    bounds[0] = bounds[0].min(x);
    bounds[1] = bounds[1].min(y);
    bounds[2] = bounds[2].max(x);
    bounds[3] = bounds[3].max(y);
}
