//! Synthetic raster generators.
//!
//! These create predictable rasters whose pixel values can be checked after
//! tiling and reassembly.

use ndarray::Array3;
use soc_common::{RasterArray, DEFAULT_BANDS};

/// Ground sampling distance used by generated rasters.
pub const TEST_GSD_M: f64 = 30.0;

/// The default model band names as owned strings.
pub fn default_band_names() -> Vec<String> {
    DEFAULT_BANDS.iter().map(|band| band.to_string()).collect()
}

/// Band names `T0..Tn` for rasters that don't need the model band order.
pub fn numbered_band_names(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("T{}", i)).collect()
}

/// A raster where every band of every pixel holds `value`.
pub fn constant_raster(rows: usize, cols: usize, bands: usize, value: f32) -> RasterArray {
    let data = Array3::from_elem((rows, cols, bands), value);
    RasterArray::new(data, numbered_band_names(bands), TEST_GSD_M)
        .expect("generated raster is well-formed")
}

/// A raster whose value at `(row, col, band)` is `row * 1000 + col + band * 0.1`.
///
/// Makes it easy to check that a tile was cut from the right place.
pub fn indexed_raster(rows: usize, cols: usize, bands: usize) -> RasterArray {
    let data = Array3::from_shape_fn((rows, cols, bands), |(row, col, band)| {
        (row * 1000 + col) as f32 + band as f32 * 0.1
    });
    RasterArray::new(data, numbered_band_names(bands), TEST_GSD_M)
        .expect("generated raster is well-formed")
}

/// A constant raster with the default model bands.
pub fn model_raster(rows: usize, cols: usize, value: f32) -> RasterArray {
    model_raster_at(rows, cols, value, TEST_GSD_M)
}

/// [`model_raster`] at an explicit ground sampling distance.
pub fn model_raster_at(rows: usize, cols: usize, value: f32, gsd_m: f64) -> RasterArray {
    let data = Array3::from_elem((rows, cols, DEFAULT_BANDS.len()), value);
    RasterArray::new(data, default_band_names(), gsd_m).expect("generated raster is well-formed")
}

/// A constant raster with every `nan_interval`-th value replaced by NaN.
pub fn raster_with_nans(
    rows: usize,
    cols: usize,
    bands: usize,
    value: f32,
    nan_interval: usize,
) -> RasterArray {
    let mut index = 0usize;
    let data = Array3::from_shape_fn((rows, cols, bands), |_| {
        index += 1;
        if nan_interval > 0 && index % nan_interval == 0 {
            f32::NAN
        } else {
            value
        }
    });
    RasterArray::new(data, numbered_band_names(bands), TEST_GSD_M)
        .expect("generated raster is well-formed")
}
