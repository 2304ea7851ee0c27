//! Performance benchmarks for gleason-quant
//!
//! Measures the per-pixel classification hot path, panel location over a
//! realistically sized composite, and full-panel aggregation.

use criterion::*;
use gleason_quant::{ColorClassifier, CountClasses, Image, LocatePanel, PanelLayout};
use image::Rgb;
use itertools::iproduct;
use std::hint::black_box;

/// Composite with a white background and a tissue-colored block in the
/// middle band, mimicking a rendered prediction panel.
fn create_composite(width: u32, height: u32) -> Image<Rgb<u8>> {
    let mut image: Image<Rgb<u8>> = Image::from_pixel(width, height, Rgb([255, 255, 255]));
    let x0 = width * 2 / 5;
    let x1 = width * 3 / 5;
    let y0 = height / 4;
    let y1 = height * 3 / 4;
    iproduct!(y0..y1, x0..x1).for_each(|(y, x)| {
        let color = if (x + y) % 3 == 0 {
            Rgb([164, 218, 158])
        } else {
            Rgb([106, 173, 213])
        };
        image.put_pixel(x, y, color);
    });
    image
}

fn bench_classify(c: &mut Criterion) {
    let classifier = ColorClassifier::clinical();
    let pixels: Vec<Rgb<u8>> = (0u32..4096)
        .map(|i| {
            Rgb([
                (i * 7 % 256) as u8,
                (i * 13 % 256) as u8,
                (i * 29 % 256) as u8,
            ])
        })
        .collect();

    c.bench_function("classify_4096_pixels", |b| {
        b.iter(|| {
            for pixel in &pixels {
                black_box(classifier.classify(black_box(*pixel)));
            }
        });
    });
}

fn bench_locate_panel(c: &mut Criterion) {
    let classifier = ColorClassifier::clinical();
    let layout = PanelLayout::default();
    let composite = create_composite(900, 600);

    c.bench_function("locate_panel_900x600", |b| {
        b.iter(|| black_box(composite.locate_prediction_panel(&layout, &classifier)));
    });
}

fn bench_count_classes(c: &mut Criterion) {
    let classifier = ColorClassifier::clinical();
    let layout = PanelLayout::default();
    let panel = create_composite(900, 600).locate_prediction_panel(&layout, &classifier);

    c.bench_function("count_classes_cropped_panel", |b| {
        b.iter(|| black_box(panel.count_classes(&classifier)));
    });
}

criterion_group!(
    benches,
    bench_classify,
    bench_locate_panel,
    bench_count_classes
);
criterion_main!(benches);
