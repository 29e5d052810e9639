//! Side-by-side comparison maps of two SOC prediction surfaces.
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐
//! │ start       │   │ end         │
//! │ surface     │gap│ surface     │
//! └─────────────┘   └─────────────┘
//! ═════════ YlGn colour bar ═══════
//! ```
//!
//! Both panels share one [`ColorScale`], so the same colour means the same
//! SOC value on either side.

use rayon::prelude::*;
use tracing::debug;

use soc_common::PredictionSurface;

use crate::colormap::{ramp_color, ColorScale, YLGN};
use crate::error::{RenderError, Result};
use crate::png::encode_png;

/// Shared scale for two surfaces.
///
/// `vmin` is the smallest strictly positive value across both surfaces when
/// both have one, otherwise 0. `vmax` is the largest value across both.
pub fn shared_scale(start: &PredictionSurface, end: &PredictionSurface) -> ColorScale {
    let vmin = match (start.min_positive(), end.min_positive()) {
        (Some(a), Some(b)) => a.min(b),
        _ => 0.0,
    };
    let vmax = start.max_value().max(end.max_value());
    ColorScale::new(vmin, vmax)
}

/// Layout options for [`render_comparison`].
#[derive(Debug, Clone, Copy)]
pub struct ComparisonOptions {
    /// Output pixels per surface cell along each axis.
    pub cell_size: usize,
    /// Transparent columns between the panels.
    pub gap: usize,
    /// Height of the colour bar under the panels; 0 disables it.
    pub colorbar_height: usize,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            cell_size: 4,
            gap: 8,
            colorbar_height: 12,
        }
    }
}

/// RGBA pixels of a comparison image.
#[derive(Debug, Clone)]
pub struct ComparisonImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
    pub scale: ColorScale,
}

impl ComparisonImage {
    pub fn to_png(&self) -> Result<Vec<u8>> {
        encode_png(&self.pixels, self.width, self.height)
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        Some([
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ])
    }
}

/// Lay out the start and end surfaces side by side on a shared scale.
pub fn compose_comparison(
    start: &PredictionSurface,
    end: &PredictionSurface,
    options: &ComparisonOptions,
) -> Result<ComparisonImage> {
    let cell = options.cell_size.max(1);
    let panel_height = start.rows().max(end.rows()) * cell;
    let start_width = start.cols() * cell;
    let end_width = end.cols() * cell;
    let width = start_width + options.gap + end_width;
    let bar_gap = if options.colorbar_height > 0 { cell } else { 0 };
    let height = panel_height + bar_gap + options.colorbar_height;

    if width == 0 || panel_height == 0 {
        return Err(RenderError::InvalidDimensions { width, height });
    }

    let scale = shared_scale(start, end);
    let row_bytes = width * 4;
    let mut pixels = vec![0u8; row_bytes * height];

    pixels
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            if y < panel_height {
                paint_panel_row(row, start, y / cell, 0, cell, &scale);
                paint_panel_row(row, end, y / cell, start_width + options.gap, cell, &scale);
            } else if y >= panel_height + bar_gap {
                paint_colorbar_row(row, width);
            }
        });

    debug!(width, height, vmin = scale.vmin, vmax = scale.vmax, "Composed comparison map");

    Ok(ComparisonImage {
        width,
        height,
        pixels,
        scale,
    })
}

/// Render the comparison straight to PNG bytes.
pub fn render_comparison(
    start: &PredictionSurface,
    end: &PredictionSurface,
    options: &ComparisonOptions,
) -> Result<Vec<u8>> {
    compose_comparison(start, end, options)?.to_png()
}

fn paint_panel_row(
    row: &mut [u8],
    surface: &PredictionSurface,
    surface_row: usize,
    x_offset: usize,
    cell: usize,
    scale: &ColorScale,
) {
    if surface_row >= surface.rows() {
        return;
    }
    for col in 0..surface.cols() {
        let value = surface.get(surface_row, col).unwrap_or(0.0);
        let rgba = scale.color(value).to_rgba();
        let start = (x_offset + col * cell) * 4;
        for px in row[start..start + cell * 4].chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }
}

fn paint_colorbar_row(row: &mut [u8], width: usize) {
    let steps = width.saturating_sub(1).max(1) as f32;
    for (x, px) in row.chunks_exact_mut(4).enumerate() {
        px.copy_from_slice(&ramp_color(&YLGN, x as f32 / steps).to_rgba());
    }
}
