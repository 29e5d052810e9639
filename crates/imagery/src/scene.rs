//! Raw Sentinel-2 scene reading.
//!
//! Scene files hold little-endian f32 samples, band-interleaved by pixel,
//! rows north to south. Each pixel carries [`SCENE_BANDS`] in order.

use std::path::Path;

use ndarray::{s, Array3, ArrayView3};

use soc_common::{Region, Result, SocError};

use crate::catalog::SceneEntry;

/// Band layout of a scene file.
pub const SCENE_BANDS: [&str; 6] = ["B2", "B3", "B4", "B8", "B11", "QA60"];

/// Reflectance bands kept after masking.
pub const REFLECTANCE_BANDS: [&str; 5] = ["B2", "B3", "B4", "B8", "B11"];

/// Surface reflectance scale of Sentinel-2 L2A digital numbers.
pub const REFLECTANCE_SCALE: f32 = 10_000.0;

const QA60_INDEX: usize = 5;
const OPAQUE_CLOUD_BIT: u32 = 1 << 10;
const CIRRUS_BIT: u32 = 1 << 11;

/// Pixel window of a scene, half open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    pub row_start: usize,
    pub row_end: usize,
    pub col_start: usize,
    pub col_end: usize,
}

impl PixelWindow {
    pub fn rows(&self) -> usize {
        self.row_end - self.row_start
    }

    pub fn cols(&self) -> usize {
        self.col_end - self.col_start
    }
}

/// Pixel window of `entry` covered by `region`, or `None` when disjoint.
///
/// Any pixel the region touches is included.
pub fn clip_window(entry: &SceneEntry, region: &Region) -> Option<PixelWindow> {
    let clip = entry.bbox.intersection(region)?;
    if entry.width == 0 || entry.height == 0 {
        return None;
    }

    let dx = entry.bbox.width() / entry.width as f64;
    let dy = entry.bbox.height() / entry.height as f64;

    let to_index = |offset: f64, step: f64, limit: usize, round_up: bool| -> usize {
        let cells = offset / step;
        let cells = if round_up { cells.ceil() } else { cells.floor() };
        (cells.max(0.0) as usize).min(limit)
    };

    let window = PixelWindow {
        row_start: to_index(entry.bbox.max_lat - clip.max_lat, dy, entry.height, false),
        row_end: to_index(entry.bbox.max_lat - clip.min_lat, dy, entry.height, true),
        col_start: to_index(clip.min_lon - entry.bbox.min_lon, dx, entry.width, false),
        col_end: to_index(clip.max_lon - entry.bbox.min_lon, dx, entry.width, true),
    };

    if window.rows() == 0 || window.cols() == 0 {
        return None;
    }
    Some(window)
}

/// Read a whole scene file into a `[row, col, band]` array of raw samples.
pub fn read_scene(entry: &SceneEntry) -> Result<Array3<f32>> {
    read_raw(&entry.path, entry.height, entry.width)
}

fn read_raw(path: &Path, rows: usize, cols: usize) -> Result<Array3<f32>> {
    let bytes = std::fs::read(path).map_err(|e| {
        SocError::image_source(format!("cannot read scene {}: {}", path.display(), e))
    })?;

    let expected = rows * cols * SCENE_BANDS.len() * 4;
    if bytes.len() != expected {
        return Err(SocError::image_source(format!(
            "scene {} is {} bytes, expected {} for {}x{}x{}",
            path.display(),
            bytes.len(),
            expected,
            rows,
            cols,
            SCENE_BANDS.len()
        )));
    }

    let values: Vec<f32> = bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect();

    Ok(Array3::from_shape_vec((rows, cols, SCENE_BANDS.len()), values)?)
}

/// Whether a QA60 sample flags opaque cloud or cirrus.
pub fn is_cloudy(qa60: f32) -> bool {
    if !qa60.is_finite() || qa60 < 0.0 {
        return false;
    }
    let bits = qa60 as u32;
    bits & (OPAQUE_CLOUD_BIT | CIRRUS_BIT) != 0
}

/// Mask clouds and scale to reflectance.
///
/// Returns the [`REFLECTANCE_BANDS`] planes; cloudy pixels become NaN in
/// every band.
pub fn mask_and_scale(raw: ArrayView3<'_, f32>) -> Array3<f32> {
    let (rows, cols, _) = raw.dim();
    let mut out = Array3::<f32>::zeros((rows, cols, REFLECTANCE_BANDS.len()));

    for row in 0..rows {
        for col in 0..cols {
            let cloudy = is_cloudy(raw[[row, col, QA60_INDEX]]);
            for band in 0..REFLECTANCE_BANDS.len() {
                out[[row, col, band]] = if cloudy {
                    f32::NAN
                } else {
                    raw[[row, col, band]] / REFLECTANCE_SCALE
                };
            }
        }
    }

    out
}

/// Read, clip, mask and scale one scene.
///
/// Returns `None` when the scene does not overlap `region`.
pub fn load_clipped(entry: &SceneEntry, region: &Region) -> Result<Option<Array3<f32>>> {
    let Some(window) = clip_window(entry, region) else {
        return Ok(None);
    };

    let raw = read_scene(entry)?;
    let clipped = raw.slice(s![
        window.row_start..window.row_end,
        window.col_start..window.col_end,
        ..
    ]);
    Ok(Some(mask_and_scale(clipped)))
}
