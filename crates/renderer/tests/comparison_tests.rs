//! Comparison map layout and encoding tests.

use ndarray::Array2;
use renderer::colormap::YLGN;
use renderer::{compose_comparison, render_comparison, ComparisonOptions};
use soc_common::PredictionSurface;

fn options() -> ComparisonOptions {
    ComparisonOptions {
        cell_size: 2,
        gap: 3,
        colorbar_height: 4,
    }
}

fn surface(rows: usize, cols: usize, value: f32) -> PredictionSurface {
    PredictionSurface::from_array(Array2::from_elem((rows, cols), value))
}

#[test]
fn test_layout_dimensions() {
    let image = compose_comparison(&surface(5, 4, 0.02), &surface(5, 6, 0.03), &options()).unwrap();

    // 4*2 + 3 + 6*2 wide; 5*2 panel + 2 spacing + 4 bar tall.
    assert_eq!(image.width, 8 + 3 + 12);
    assert_eq!(image.height, 10 + 2 + 4);
    assert_eq!(image.pixels.len(), image.width * image.height * 4);
}

#[test]
fn test_panels_share_scale() {
    let image = compose_comparison(&surface(2, 2, 0.02), &surface(2, 2, 0.04), &options()).unwrap();

    assert_eq!(image.scale.vmin, 0.02);
    assert_eq!(image.scale.vmax, 0.04);
    // Lowest value on the left, highest on the right.
    assert_eq!(image.pixel(0, 0), Some(YLGN[0].to_rgba()));
    assert_eq!(image.pixel(image.width - 1, 0), Some(YLGN[8].to_rgba()));
}

#[test]
fn test_unpredicted_pixels_and_gap_are_transparent() {
    let mut start = PredictionSurface::zeros(3, 3);
    start.fill_block(0, 0, 2, 0.05);
    let image = compose_comparison(&start, &surface(3, 3, 0.05), &options()).unwrap();

    // Surface cell (2, 2) is unpredicted.
    assert_eq!(image.pixel(5, 5).map(|px| px[3]), Some(0));
    // First gap column.
    assert_eq!(image.pixel(6, 0).map(|px| px[3]), Some(0));
    // Predicted cell is opaque.
    assert_eq!(image.pixel(0, 0).map(|px| px[3]), Some(255));
}

#[test]
fn test_colorbar_spans_ramp() {
    let image = compose_comparison(&surface(2, 2, 0.02), &surface(2, 2, 0.04), &options()).unwrap();
    let bar_y = image.height - 1;

    assert_eq!(image.pixel(0, bar_y), Some(YLGN[0].to_rgba()));
    assert_eq!(image.pixel(image.width - 1, bar_y), Some(YLGN[8].to_rgba()));
}

#[test]
fn test_all_zero_surfaces_render_transparent_panels() {
    let image = compose_comparison(
        &PredictionSurface::zeros(2, 2),
        &PredictionSurface::zeros(2, 2),
        &options(),
    )
    .unwrap();
    assert_eq!(image.scale.vmax, 0.0);
    assert!((0..4).all(|y| image.pixel(1, y).map(|px| px[3]) == Some(0)));
}

#[test]
fn test_png_output() {
    let png = render_comparison(&surface(4, 4, 0.02), &surface(4, 4, 0.03), &options()).unwrap();
    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
    assert_eq!(&png[12..16], b"IHDR");
}

#[test]
fn test_empty_surfaces_rejected() {
    let result = compose_comparison(
        &PredictionSurface::zeros(0, 0),
        &PredictionSurface::zeros(0, 0),
        &options(),
    );
    assert!(result.is_err());
}
